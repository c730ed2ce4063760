mod webhook;

pub use webhook::*;
