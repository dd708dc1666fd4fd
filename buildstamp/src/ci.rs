//! CI host detection.
//!
//! A recognized host is detected through its marker environment variable
//! and contributes the build counter that
//! [`derive_build_number`](crate::versioning::derive_build_number) can
//! prefer over the timestamp scheme.

use tracing::debug;

/// Marker variable and counter variable per recognized host. The first
/// marker present in the environment wins.
const HOSTS: &[(&str, &str, &str)] = &[
    ("Azure DevOps", "TF_BUILD", "BUILD_BUILDID"),
    ("GitHub Actions", "GITHUB_ACTIONS", "GITHUB_RUN_NUMBER"),
    ("GitLab CI", "GITLAB_CI", "CI_PIPELINE_IID"),
    ("Jenkins", "JENKINS_URL", "BUILD_NUMBER"),
    ("TeamCity", "TEAMCITY_VERSION", "BUILD_NUMBER"),
    ("CircleCI", "CIRCLECI", "CIRCLE_BUILD_NUM"),
    ("Travis CI", "TRAVIS", "TRAVIS_BUILD_NUMBER"),
    ("AppVeyor", "APPVEYOR", "APPVEYOR_BUILD_NUMBER"),
    ("App Center", "APPCENTER_BUILD_ID", "APPCENTER_BUILD_ID"),
];

/// What the build host reports about itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CiEnvironment {
    pub is_build_host: bool,
    pub build_counter: Option<String>,
}

impl CiEnvironment {
    /// Detects the current host from the process environment.
    pub fn detect() -> Self {
        Self::from_env(|name| std::env::var(name).ok())
    }

    /// Detects the host against an arbitrary variable lookup.
    pub fn from_env<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        for &(host, marker, counter) in HOSTS {
            if lookup(marker).is_some_and(|v| !v.is_empty()) {
                debug!(host, "recognized build host");
                return CiEnvironment {
                    is_build_host: true,
                    build_counter: lookup(counter).filter(|v| !v.is_empty()),
                };
            }
        }
        CiEnvironment::default()
    }

    /// A local machine: no host, no counter.
    pub fn local() -> Self {
        CiEnvironment::default()
    }
}
