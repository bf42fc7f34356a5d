pub mod bespoke;

use std::collections::HashMap;

use prometheus::Registry;

pub const NAMESPACE: &str = "konsumer_lag";

pub const LABEL_TOPIC: &str = "topic";
pub const LABEL_GROUP: &str = "group";

/// Create the [`Registry`] of the internal metrics of the service.
///
/// Every metric registered with it is labelled with the monitored `topic` and consumer `group`.
pub fn init(topic: &str, group: &str) -> Registry {
    let prom_def_labels = HashMap::from([
        (LABEL_TOPIC.to_string(), topic.to_string()),
        (LABEL_GROUP.to_string(), group.to_string()),
    ]);

    info!("Prometheus Metrics default labels:\n{:#?}", prom_def_labels);

    Registry::new_custom(Some(NAMESPACE.to_string()), Some(prom_def_labels))
        .expect("Unable to create a Prometheus Metrics Registry")
}
