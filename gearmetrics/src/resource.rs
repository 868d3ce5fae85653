//! Who is reporting: the static labels attached to every series.

use std::collections::HashMap;

/// Cluster label for every series from this process.
pub const CLUSTER_NAME: &str = "vdc";
/// Monitored resource type for every series from this process.
pub const RESOURCE_TYPE: &str = "k8s_container";

/// Environment variable holding the project that receives the series.
pub const PROJECT_ID_VAR: &str = "HAIL_GCP_PROJECT";
/// Environment variable holding the zone the process runs in.
pub const ZONE_VAR: &str = "HAIL_GCP_ZONE";
/// Environment variable holding the container name.
pub const CONTAINER_NAME_VAR: &str = "KUBERNETES_CONTAINER_NAME";
/// Environment variable holding the pod name.
pub const POD_NAME_VAR: &str = "KUBERNETES_POD_NAME";
/// Environment variable holding the deploy namespace.
pub const NAMESPACE_VAR: &str = "HAIL_DEFAULT_NAMESPACE";

const DEFAULT_NAMESPACE: &str = "default";

/// Static identifying metadata for the `k8s_container` monitored resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLabels {
    /// Kubernetes cluster
    pub cluster_name: String,
    /// Kubernetes namespace
    pub namespace: String,
    /// Zone
    pub location: String,
    /// Container within the pod
    pub container_name: String,
    /// Pod
    pub pod_name: String,
}

impl ResourceLabels {
    /// The label map as the monitoring backend names it.
    pub fn to_label_map(&self) -> HashMap<String, String> {
        HashMap::from([
            ("cluster_name".to_string(), self.cluster_name.clone()),
            ("namespace_name".to_string(), self.namespace.clone()),
            ("location".to_string(), self.location.clone()),
            ("container_name".to_string(), self.container_name.clone()),
            ("pod_name".to_string(), self.pod_name.clone()),
        ])
    }
}

/// Process identity, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceIdentity {
    /// Project that owns the written series
    pub project_id: String,
    /// Labels attached to every series
    pub labels: ResourceLabels,
}

impl ResourceIdentity {
    /// Read identity from the process environment.
    ///
    /// Missing variables are not an error: they are logged and written as empty labels.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve identity through an arbitrary lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let required = |key: &str| match lookup(key) {
            Some(value) => value,
            None => {
                log::warn!("{key} is not set; series will carry an empty label for it");
                String::new()
            }
        };

        Self {
            project_id: required(PROJECT_ID_VAR),
            labels: ResourceLabels {
                cluster_name: CLUSTER_NAME.to_string(),
                namespace: lookup(NAMESPACE_VAR).unwrap_or_else(|| DEFAULT_NAMESPACE.to_string()),
                location: required(ZONE_VAR),
                container_name: required(CONTAINER_NAME_VAR),
                pod_name: required(POD_NAME_VAR),
            },
        }
    }

    /// The destination resource name for writes, `projects/{project_id}`.
    pub fn project_path(&self) -> String {
        format!("projects/{}", self.project_id)
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use super::{ResourceIdentity, ResourceLabels};

    #[test_log::test]
    fn reads_every_label() {
        let environment = HashMap::from([
            ("HAIL_GCP_PROJECT", "hail-vdc"),
            ("HAIL_GCP_ZONE", "us-central1-a"),
            ("KUBERNETES_CONTAINER_NAME", "batch-driver"),
            ("KUBERNETES_POD_NAME", "batch-driver-5d9c"),
            ("HAIL_DEFAULT_NAMESPACE", "test"),
        ]);

        let identity =
            ResourceIdentity::from_lookup(|key| environment.get(key).map(|v| v.to_string()));

        assert_eq!("projects/hail-vdc", identity.project_path());
        assert_eq!(
            ResourceLabels {
                cluster_name: "vdc".to_string(),
                namespace: "test".to_string(),
                location: "us-central1-a".to_string(),
                container_name: "batch-driver".to_string(),
                pod_name: "batch-driver-5d9c".to_string(),
            },
            identity.labels
        );
        assert_eq!(
            Some(&"test".to_string()),
            identity.labels.to_label_map().get("namespace_name")
        );
    }

    #[test_log::test]
    fn missing_variables_are_empty() {
        let identity = ResourceIdentity::from_lookup(|_| None);

        assert_eq!("projects/", identity.project_path());
        assert_eq!("", identity.labels.location);
        assert_eq!("", identity.labels.pod_name);
        assert_eq!("default", identity.labels.namespace);
        assert_eq!("vdc", identity.labels.cluster_name);
    }
}
