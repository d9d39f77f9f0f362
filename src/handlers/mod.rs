// handlers/mod.rs - 3-Tier Handler Architecture
//
// Public (no auth) → Protected (JWT auth) → Elevated (JWT auth + route ACL)
pub mod elevated;
pub mod protected;
pub mod public;
