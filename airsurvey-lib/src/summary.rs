use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::snapshot::Channel;
use crate::sync::Step;

#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChannelSummary {
    pub accepted: usize,
    pub rejected: usize,
    /// Number of window flushes that reported the channel stale.
    pub stale: usize,
}

/// Tracks stats on processed lines and records.
///
/// # Example
/// ```
/// use airsurvey::header::split_record;
/// use airsurvey::{Summary, Synchronizer};
///
/// let mut sync = Synchronizer::new();
/// let mut summary = Summary::default();
/// for line in ["$TRM,1000,20.0,", "$TRM,1500,bad,", "$TRM,2000,21.0,"] {
///     let rec = split_record(line).unwrap();
///     summary.add(&sync.process(&rec, None));
/// }
/// assert_eq!(summary.records, 3);
/// assert_eq!(summary.flushes, 1);
/// ```
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Summary {
    /// Text lines read, not counting binary frames
    pub lines: usize,
    /// Lines skipped before reaching the synchronizer
    pub skipped: usize,
    /// Records handed to the synchronizer
    pub records: usize,
    /// Records in a header group with no channel for their sub-header
    pub unrouted: usize,
    /// Spectrometer frames read from the stream, whether decoded or not
    pub frames: usize,
    pub flushes: usize,
    pub first_epoch: Option<i64>,
    pub last_epoch: Option<i64>,
    pub channels: BTreeMap<Channel, ChannelSummary>,
}

impl Summary {
    pub fn add(&mut self, step: &Step) {
        self.records += 1;
        match step {
            Step::Skipped(_) => self.unrouted += 1,
            Step::Accumulated(channel) => {
                self.channels.entry(*channel).or_default().accepted += 1;
            }
            Step::Rejected(channel, _) => {
                self.channels.entry(*channel).or_default().rejected += 1;
            }
            Step::Flushed { epoch, stale } => {
                self.flushes += 1;
                self.first_epoch.get_or_insert(*epoch);
                self.last_epoch = Some(*epoch);
                for s in stale {
                    self.channels.entry(s.channel).or_default().stale += 1;
                }
            }
        }
    }

    /// Fold the counts of `other` into this summary.
    pub fn merge(&mut self, other: &Summary) {
        self.lines += other.lines;
        self.skipped += other.skipped;
        self.records += other.records;
        self.unrouted += other.unrouted;
        self.frames += other.frames;
        self.flushes += other.flushes;
        if self.first_epoch.is_none() {
            self.first_epoch = other.first_epoch;
        }
        if other.last_epoch.is_some() {
            self.last_epoch = other.last_epoch;
        }
        for (channel, summary) in &other.channels {
            let entry = self.channels.entry(*channel).or_default();
            entry.accepted += summary.accepted;
            entry.rejected += summary.rejected;
            entry.stale += summary.stale;
        }
    }
}
