/// Which replica set members a read may be served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum ReadFrom {
    #[default]
    Primary,
    PreferReplica,
    AzAffinity,
    AzAffinityReplicasAndPrimary,
}
