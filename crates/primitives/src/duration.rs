/// A timestamp expressed as the `Duration` elapsed since the Unix epoch.
///
/// Kept as a type alias, not a newtype, so it composes with
/// [`std::time::Duration`]'s arithmetic and with the workspace's clock
/// abstraction's `Time` trait without conversions at every call site.
pub type DurationSinceUnixEpoch = std::time::Duration;
