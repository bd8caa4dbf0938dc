// Handlers are grouped by the capability a route requires:
// public (none), protected (signed in) and elevated (admin).
pub mod elevated;
pub mod protected;
pub mod public;
