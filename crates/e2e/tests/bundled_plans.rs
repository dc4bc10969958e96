//! Plans shipped in the repository parse and describe the visitor journey

use flowcheck_common::SuiteCategory;
use flowcheck_e2e::{StepAction, TestPlan};
use std::path::Path;

#[test]
fn storefront_plan_loads() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../plans");
    let plans = TestPlan::load(&dir).unwrap();

    let storefront = plans
        .iter()
        .find(|p| p.name == "storefront-visitor")
        .unwrap();
    assert_eq!(storefront.suites[0].category, SuiteCategory::Basic);
    assert_eq!(storefront.step_count(), 11);

    let suites = storefront.clone().into_suites();
    let described: Vec<_> = suites[0].steps.iter().map(|s| s.describe()).collect();
    assert_eq!(described[0], "navigate:/");
    assert_eq!(described[1], "snapshot:home_page");
    assert_eq!(described.last().unwrap(), "snapshot:login_page");
}
