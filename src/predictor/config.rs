use serde::Deserialize;

/// How timestamps outside the known trip range are extrapolated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum TailMode {
    /// Constant pace of the first (leading) or last (trailing) two schedule
    /// anchors.
    #[default]
    ScheduleEnds,
    /// The schedule's own pace, segment by segment.
    Profile,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tail_mode: TailMode,
}
