//! Shared AWS SDK plumbing.
//!
//! The SDK is async; strata is not. Each client owns a current-thread
//! runtime and blocks on every call.

use tokio::runtime::Runtime;

/// Build the runtime a blocking AWS client runs its calls on.
pub fn runtime() -> std::io::Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

/// Load AWS configuration from the environment, optionally pinning a region.
pub fn load_config(rt: &Runtime, region: Option<&str>) -> aws_config::SdkConfig {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
    if let Some(region) = region {
        loader = loader.region(aws_config::Region::new(region.to_string()));
    }
    rt.block_on(loader.load())
}
