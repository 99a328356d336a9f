//! Registry sweep against file-backed settings with an overlay chain.

use std::fs;

use tempfile::TempDir;

use portcullis::{
    ComponentRegistry, FilterNaming, GlobalFilterNaming, PredicateNaming, Settings,
};

fn gateway_registry() -> ComponentRegistry {
    let mut registry = ComponentRegistry::new();
    registry
        .register("RandomRoutePredicateFactory", PredicateNaming)
        .unwrap();
    registry
        .register("RemoteAddrRoutePredicateFactory", PredicateNaming)
        .unwrap();
    registry
        .register("RemoveRequestHeaderFilterFactory", FilterNaming)
        .unwrap();
    registry
        .register("LoadBalancerClientFilter", GlobalFilterNaming)
        .unwrap();
    registry
}

#[test]
fn overlayed_settings_drive_the_sweep() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("base.toml"),
        "[gateway.random]\nenabled = false\n\n[gateway.remote-addr]\nenabled = false\n",
    )
    .unwrap();
    let overlay_path = dir.path().join("site.toml");
    fs::write(
        &overlay_path,
        "[meta]\nbase = \"base.toml\"\n\n[gateway.remote-addr]\nenabled = true\n",
    )
    .unwrap();

    let settings = Settings::from_file(&overlay_path).unwrap();
    let report = gateway_registry().resolve(&settings);

    // Base refuses both predicates; the overlay re-admits one of them.
    assert!(!report.admits("RandomRoutePredicateFactory"));
    assert!(report.admits("RemoteAddrRoutePredicateFactory"));

    // Unconfigured components ride the fail-open default.
    assert!(report.admits("RemoveRequestHeaderFilterFactory"));
    assert!(report.admits("LoadBalancerClientFilter"));
}

#[test]
fn report_carries_keys_and_reasons_for_operators() {
    let settings = Settings::from_pairs([("gateway.load-balancer-client.enabled", "false")]);
    let report = gateway_registry().resolve(&settings);

    let refused = &report.refused;
    assert_eq!(refused.len(), 1);
    assert_eq!(refused[0].component, "LoadBalancerClientFilter");
    assert_eq!(refused[0].category, "global-filter");
    assert_eq!(refused[0].key, "gateway.load-balancer-client.enabled");
    assert!(refused[0].reason.contains("disabled"));

    let json = report.to_json();
    assert!(json.contains("gateway.load-balancer-client.enabled"));
    assert!(json.contains("\"admitted\""));
}

#[test]
fn empty_settings_admit_the_whole_registry() {
    let report = gateway_registry().resolve(&Settings::new());
    assert_eq!(report.admitted.len(), 4);
    assert!(report.refused.is_empty());
}
