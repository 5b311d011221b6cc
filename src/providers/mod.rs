pub mod bonk;
