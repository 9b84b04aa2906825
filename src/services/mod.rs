pub mod aggregate;
pub mod checker;
pub mod coverage;
pub mod detector;
pub mod encoding;
pub mod extraction;
pub mod git;
pub mod locator;
pub mod report;
pub mod snapshot;
