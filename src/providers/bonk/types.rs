use serde::{Deserialize, Serialize};

pub const TXT: &str = "TXT";

/// Zone type passed to the zone listing; only externally served zones are
/// candidates for challenge records.
pub const EXTERNAL_ZONE_TYPE: &str = "external";

/// Record as returned by `GET /record/{name}/TXT/`. Only the value list is
/// read; zone, name, ttl and permissions are left to the server.
#[derive(Deserialize, Debug, Clone)]
pub struct BonkRecord {
    pub value: Vec<String>,
}

#[allow(dead_code)]
#[derive(Deserialize, Debug, Clone)]
pub struct BonkZone {
    pub name: String,
    #[serde(rename = "type", default)]
    pub zone_type: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Permissions {
    pub write: Vec<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CreateRecordRequest {
    pub zone: String,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub value: Vec<String>,
    pub ttl: u32,
    pub permissions: Permissions,
}

impl CreateRecordRequest {
    pub fn txt(zone: &str, name: &str, value: String, ttl: u32, group: &str) -> Self {
        CreateRecordRequest {
            zone: zone.to_string(),
            name: name.to_string(),
            record_type: TXT.to_string(),
            value: vec![value],
            ttl,
            permissions: Permissions {
                write: vec![group.to_string()],
            },
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PatchRecordRequest {
    pub value: Vec<String>,
}
