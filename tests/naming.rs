// ABOUTME: Property tests for paulenv naming conventions.
// ABOUTME: Names built for a project always derive that project back.

use paulenv::engine::parse;
use paulenv::types::naming::*;
use proptest::prelude::*;

fn project_name() -> impl Strategy<Value = String> {
    "[a-z0-9][a-z0-9_.-]{0,30}"
}

proptest! {
    #[test]
    fn image_reference_round_trips(project in project_name()) {
        prop_assert_eq!(project_from_image(&image_reference(&project)), Some(project));
    }

    #[test]
    fn default_network_derives_project(project in project_name()) {
        let network = format!("{}{}", compose_project_name(&project), DEFAULT_NETWORK_SUFFIX);
        prop_assert_eq!(project_from_network(&network), Some(project));
    }

    #[test]
    fn foreign_names_derive_nothing(name in "[a-oq-z][a-z0-9:_-]{0,20}") {
        prop_assert_eq!(project_from_image(&name), None);
        prop_assert_eq!(project_from_network(&name), None);
    }

    #[test]
    fn listing_keeps_every_line_in_order(projects in prop::collection::vec(project_name(), 0..20)) {
        let output: String = projects
            .iter()
            .map(|p| format!("{}\t2024-01-15 10:30:00 +0000 UTC\n", image_reference(p)))
            .collect();

        let images = parse::images(&output);

        prop_assert_eq!(images.len(), projects.len());
        for (image, project) in images.iter().zip(&projects) {
            prop_assert_eq!(image.project_name.as_deref(), Some(project.as_str()));
            prop_assert!(image.built_at.is_some());
        }
    }
}
