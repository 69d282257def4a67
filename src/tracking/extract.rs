//! Joint extraction shared by both sensor generations
//!
//! A frame is reduced to the head and hand joints of its first tracked
//! subject. The joint scan folds into a `JointAccumulator` and stops as soon
//! as all three joints have been seen.

use crate::tracking::types::{JointType, Quaternion, TrackingData, Vector3};
use std::ops::ControlFlow;

/// A skeleton or body as reported by a sensor SDK
pub trait TrackedSubject {
    /// Whether the SDK is actively tracking this subject (not merely detecting it)
    fn is_tracked(&self) -> bool;

    /// Joint positions in the order the device enumerates them
    fn joints(&self) -> impl Iterator<Item = (JointType, Vector3)> + '_;

    /// Orientation the SDK reports for the given joint
    fn orientation(&self, joint: JointType) -> Quaternion;
}

/// Head and hand joints of one subject, all present
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedJoints {
    pub head: Vector3,
    pub left: (Vector3, Quaternion),
    pub right: (Vector3, Quaternion),
}

impl TrackedJoints {
    /// Overwrite the record in place with these joints
    pub fn apply_to(&self, data: &mut TrackingData) {
        data.set_head(self.head);
        data.set_left(self.left.0, self.left.1);
        data.set_right(self.right.0, self.right.1);
    }
}

/// Partial result of a joint scan
#[derive(Debug, Clone, Copy, Default)]
pub struct JointAccumulator {
    head: Option<Vector3>,
    left: Option<(Vector3, Quaternion)>,
    right: Option<(Vector3, Quaternion)>,
}

impl JointAccumulator {
    /// Record one joint. Breaks with the complete set once head and both hands are known.
    pub fn push<S: TrackedSubject>(
        mut self,
        subject: &S,
        joint: JointType,
        position: Vector3,
    ) -> ControlFlow<TrackedJoints, Self> {
        match joint {
            JointType::Head => self.head = Some(position),
            JointType::HandLeft => self.left = Some((position, subject.orientation(joint))),
            JointType::HandRight => self.right = Some((position, subject.orientation(joint))),
            _ => {}
        }

        match self.complete() {
            Some(joints) => ControlFlow::Break(joints),
            None => ControlFlow::Continue(self),
        }
    }

    pub fn complete(&self) -> Option<TrackedJoints> {
        Some(TrackedJoints {
            head: self.head?,
            left: self.left?,
            right: self.right?,
        })
    }

    /// Number of target joints found so far
    pub fn found(&self) -> usize {
        usize::from(self.head.is_some())
            + usize::from(self.left.is_some())
            + usize::from(self.right.is_some())
    }
}

/// Scan one subject's joints, stopping at the first point all three are known
pub fn extract_joints<S: TrackedSubject>(subject: &S) -> Option<TrackedJoints> {
    let scan = subject
        .joints()
        .try_fold(JointAccumulator::default(), |acc, (joint, position)| {
            acc.push(subject, joint, position)
        });

    match scan {
        ControlFlow::Break(joints) => Some(joints),
        ControlFlow::Continue(partial) => {
            tracing::trace!("Incomplete subject: {} of 3 joints found", partial.found());
            None
        }
    }
}

/// Extract joints from the first tracked subject of a frame
///
/// Later tracked subjects are ignored even when the first one is missing a
/// joint; only a single user is supported.
pub fn extract_first_tracked<'a, S, I>(subjects: I) -> Option<TrackedJoints>
where
    S: TrackedSubject + 'a,
    I: IntoIterator<Item = &'a S>,
{
    let subject = subjects.into_iter().find(|s| s.is_tracked())?;
    extract_joints(subject)
}
