//! Build target definitions.
//!
//! A build target is one brand built for one platform. The plan lists them
//! brand-major, in configuration order, which is also the order failures are
//! reported in.

use crate::build::BuildContext;
use crate::platforms::{expand_platforms, platform_config, PlatformConfig};

/// A build target representing work to be done.
#[derive(Debug, Clone)]
pub struct BuildTarget {
    /// Unique identifier for this target (`brand/platform`)
    pub id: String,
    pub brand: String,
    pub platform: String,
    /// Platform tables with the brand's output directory filled in
    pub config: PlatformConfig,
}

impl BuildTarget {
    /// Create the target for `brand` on `platform`, or `None` for an unknown
    /// platform.
    pub fn new(brand: &str, platform: &str, build_dir: &std::path::Path) -> Option<Self> {
        let config = platform_config(platform, brand, build_dir)?;
        Some(Self {
            id: format!("{}/{}", brand, platform),
            brand: brand.to_string(),
            platform: platform.to_string(),
            config,
        })
    }

    /// Check if this target matches a filter string.
    ///
    /// Supports patterns like:
    /// - Exact match: "acme/css"
    /// - Brand match: "acme/*" or just "acme"
    /// - Platform match: "*/css"
    pub fn matches_filter(&self, filter: &str) -> bool {
        if self.id == filter || self.brand == filter {
            return true;
        }

        if let Some((brand_pat, platform_pat)) = filter.split_once('/') {
            let brand_matches = brand_pat == "*" || brand_pat == self.brand;
            let platform_matches = platform_pat == "*" || platform_pat == self.platform;
            return brand_matches && platform_matches;
        }

        false
    }
}

/// The ordered list of targets for one run.
#[derive(Debug, Default)]
pub struct BuildPlan {
    targets: Vec<BuildTarget>,
}

impl BuildPlan {
    /// Create a new empty build plan.
    pub fn new() -> Self {
        Self { targets: vec![] }
    }

    /// Add a target to the plan.
    pub fn add_target(&mut self, target: BuildTarget) {
        self.targets.push(target);
    }

    /// Get all targets in the plan.
    pub fn targets(&self) -> &[BuildTarget] {
        &self.targets
    }

    /// Get the number of targets in the plan.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Check if the plan is empty.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Keep only targets matching one of the given patterns.
    pub fn filter(mut self, patterns: &[String]) -> Self {
        if patterns.is_empty() {
            return self;
        }
        self.targets.retain(|t| patterns.iter().any(|p| t.matches_filter(p)));
        self
    }
}

/// Create the brand x platform plan from the context's configuration.
///
/// `*` expands to every known platform. Platforms were validated by the
/// config resolver, so an unknown name here is only logged. The context's
/// target filter applies last.
pub fn create_build_plan(ctx: &BuildContext) -> BuildPlan {
    let platforms = expand_platforms(&ctx.config().platforms);
    let build_dir = ctx.build_dir();

    let mut plan = BuildPlan::new();
    for brand in &ctx.config().brands {
        for platform in &platforms {
            match BuildTarget::new(brand, platform, &build_dir) {
                Some(target) => plan.add_target(target),
                None => log::warn!("Skipping unknown platform '{}'", platform),
            }
        }
    }

    match ctx.target_filter() {
        Some(filter) => plan.filter(filter),
        None => plan,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_config;
    use crate::platforms::KNOWN_PLATFORMS;
    use std::path::{Path, PathBuf};

    fn context(brands: &[&str], platforms: &[&str]) -> BuildContext {
        let mut config = default_config();
        config.brands = brands.iter().map(|s| s.to_string()).collect();
        config.platforms = platforms.iter().map(|s| s.to_string()).collect();
        BuildContext::new(config, PathBuf::from("/project"))
    }

    #[test]
    fn test_target_id_and_output_dir() {
        let target = BuildTarget::new("acme", "css", Path::new("/out")).expect("css is known");
        assert_eq!(target.id, "acme/css");
        assert_eq!(target.config.build_path, PathBuf::from("/out/acme/css"));
        assert!(BuildTarget::new("acme", "flash", Path::new("/out")).is_none());
    }

    #[test]
    fn test_plan_is_brand_major() {
        let plan = create_build_plan(&context(&["a", "b"], &["css", "js"]));
        let ids: Vec<_> = plan.targets().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a/css", "a/js", "b/css", "b/js"]);
    }

    #[test]
    fn test_plan_expands_wildcard() {
        let plan = create_build_plan(&context(&["acme"], &["*"]));
        assert_eq!(plan.len(), KNOWN_PLATFORMS.len());
        assert_eq!(plan.len(), 9);
    }

    #[test]
    fn test_plan_dedupes_platforms() {
        let plan = create_build_plan(&context(&["acme"], &["css", "*"]));
        assert_eq!(plan.len(), 9);
        assert_eq!(plan.targets()[0].platform, "css");
    }

    #[test]
    fn test_matches_filter() {
        let target = BuildTarget::new("acme", "css", Path::new("/out")).unwrap();
        assert!(target.matches_filter("acme/css"));
        assert!(target.matches_filter("acme"));
        assert!(target.matches_filter("acme/*"));
        assert!(target.matches_filter("*/css"));
        assert!(!target.matches_filter("*/js"));
        assert!(!target.matches_filter("other"));
    }

    #[test]
    fn test_plan_filter() {
        let ctx = context(&["a", "b"], &["css", "js"]).with_filter(vec!["*/js".to_string()]);
        let plan = create_build_plan(&ctx);
        assert_eq!(plan.len(), 2);
        assert!(plan.targets().iter().all(|t| t.platform == "js"));
    }
}
