//! Developer tooling: read-only scene inspection.

mod inspector;

pub use inspector::{ObjectInfo, SceneInspector, SceneSummary};

pub fn crate_info() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tools"));
    }
}
