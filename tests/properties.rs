//! Property tests for benchmark command construction.

use std::path::Path;

use proptest::prelude::*;

use benchstack::suite::{PerfTestSuite, WorkloadArgs};
use benchstack::BundleManifest;

fn manifest_with(id: &str, architecture: &str) -> BundleManifest {
    serde_yaml_ng::from_str(&format!(
        r#"
build:
  name: SearchBundle
  version: 1.1.0
  platform: linux
  architecture: {architecture}
  id: "{id}"
  location: https://artifacts.example.com/dist.tar.gz
"#
    ))
    .unwrap()
}

proptest! {
    #[test]
    fn command_has_security_flag_iff_secured(
        endpoint in "[0-9]{1,3}\\.[0-9]{1,3}\\.[0-9]{1,3}\\.[0-9]{1,3}",
        build_id in "[a-z0-9]{4,12}",
        architecture in prop::sample::select(vec!["x64", "arm64"]),
        security in any::<bool>(),
    ) {
        let manifest = manifest_with(&build_id, architecture);
        let suite = PerfTestSuite::new(
            &manifest,
            &endpoint,
            security,
            Path::new("/tmp/w/infra"),
            Path::new("/tmp/w/test-results"),
            &WorkloadArgs::default(),
        );
        let command = suite.command();

        let endpoint_arg = format!("-i {endpoint}");
        let build_id_arg = format!("-b {build_id}");
        let architecture_arg = format!("-a {architecture}");
        prop_assert!(command.contains(&endpoint_arg));
        prop_assert!(command.contains(&build_id_arg));
        prop_assert!(command.contains(&architecture_arg));
        prop_assert!(command.contains("-p /tmp/w/test-results"));
        prop_assert_eq!(command.ends_with(" -s"), security);
    }
}
