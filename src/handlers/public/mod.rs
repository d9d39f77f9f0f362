// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Security Level: None
// Middleware: authenticate still runs, anonymous callers pass through.
// A malformed or invalid Authorization header is rejected with 401 here too,
// it is never silently ignored.

pub mod status;

pub use status::get_status;
