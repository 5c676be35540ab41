pub mod artifact;
pub mod export;
pub mod notify;
pub mod render;
pub mod submission; // validate → render → export → persist → notify → record
