// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Spiralbook Contributors

//! Ordered page-turn state machine.
//!
//! Surfaces turn strictly in chain order: the front cover first, then
//! pages front to back. The controller validates each request against
//! the chain, dispatches a [`TransitionRequest`] to the host's
//! [`Animator`], and flips the logical state immediately; the host calls
//! [`PageTurnController::complete`] when the interpolation lands so the
//! end transform is committed and the in-flight guard clears. Illegal
//! requests return `false` without side effects.

use crate::book::{BookModel, PivotId, SurfaceKind};
use crate::scene::NodeId;
use std::f64::consts::{FRAC_PI_4, PI};

/// Rotation reached by a fully open surface, before the per-index fan.
const OPEN_ANGLE: f64 = -PI - 0.2;
/// Per-page fan added to the open angle so open surfaces never coincide.
const OPEN_ANGLE_STEP: f64 = 0.001;
/// Depth the front cover settles at while open.
const COVER_OPEN_Z: f64 = -0.1;
/// Container pitch while the book is open for reading.
const GROUP_TILT_X: f64 = -FRAC_PI_4 + 0.2;
const COVER_TURN_SECS: f64 = 1.5;
const PAGE_TURN_SECS: f64 = 1.2;

/// A transform property an animation can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    RotationX,
    RotationY,
    PositionZ,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Power2InOut,
    Power2Out,
}

/// What a transition animates: one pivot, or the whole-group tilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimTarget {
    Pivot(PivotId),
    GroupTilt,
}

/// One animation the host is asked to run.
#[derive(Debug, Clone)]
pub struct TransitionRequest {
    pub target: AnimTarget,
    pub node: NodeId,
    /// Channel end values; intermediate interpolation is the host's.
    pub channels: Vec<(Channel, f64)>,
    pub duration_secs: f64,
    pub easing: Easing,
}

/// Interpolates transitions over time. Implemented by the host.
pub trait Animator {
    fn animate(&mut self, request: TransitionRequest);
}

#[derive(Debug, Clone)]
struct Pending {
    target: AnimTarget,
    node: NodeId,
    channels: Vec<(Channel, f64)>,
}

/// Drives open/close transitions over a [`BookModel`]'s pivot chain.
#[derive(Debug, Default)]
pub struct PageTurnController {
    pending: Vec<Pending>,
}

impl PageTurnController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open one surface. Legal only while the surface is closed, its
    /// predecessor in the chain is open, and nothing relevant is
    /// animating. Returns whether a transition was dispatched.
    pub fn open(
        &mut self,
        model: &mut BookModel,
        id: PivotId,
        animator: &mut dyn Animator,
    ) -> bool {
        let pivot = model.pivot(id);
        if pivot.kind == SurfaceKind::BackCover || pivot.turned || pivot.animating {
            return false;
        }
        match pivot.kind {
            SurfaceKind::FrontCover => {
                if model.group_animating() {
                    return false;
                }
            }
            SurfaceKind::Page(_) => {
                // Predecessor in the chain is the previous pivot.
                if !model.pivot(PivotId(id.0 - 1)).turned {
                    return false;
                }
            }
            SurfaceKind::BackCover => unreachable!(),
        }

        let node = model.pivot(id).node;
        let container = model.container();
        match model.pivot(id).kind {
            SurfaceKind::FrontCover => {
                self.dispatch(
                    model,
                    AnimTarget::Pivot(id),
                    node,
                    vec![
                        (Channel::RotationY, OPEN_ANGLE),
                        (Channel::PositionZ, COVER_OPEN_Z),
                    ],
                    COVER_TURN_SECS,
                    Easing::Power2InOut,
                    animator,
                );
                self.dispatch(
                    model,
                    AnimTarget::GroupTilt,
                    container,
                    vec![(Channel::RotationX, GROUP_TILT_X)],
                    COVER_TURN_SECS,
                    Easing::Power2Out,
                    animator,
                );
            }
            SurfaceKind::Page(index) => {
                let lift = (index as f64 + 1.0) * model.config().page_thickness;
                self.dispatch(
                    model,
                    AnimTarget::Pivot(id),
                    node,
                    vec![
                        (Channel::RotationY, OPEN_ANGLE + index as f64 * OPEN_ANGLE_STEP),
                        (Channel::PositionZ, lift),
                    ],
                    PAGE_TURN_SECS,
                    Easing::Power2InOut,
                    animator,
                );
            }
            SurfaceKind::BackCover => unreachable!(),
        }
        model.pivot_mut(id).turned = true;
        true
    }

    /// Close one surface. Legal only while the surface is open, its
    /// successor in the chain is closed, and nothing relevant is
    /// animating. Returns whether a transition was dispatched.
    pub fn close(
        &mut self,
        model: &mut BookModel,
        id: PivotId,
        animator: &mut dyn Animator,
    ) -> bool {
        let pivot = model.pivot(id);
        if pivot.kind == SurfaceKind::BackCover || !pivot.turned || pivot.animating {
            return false;
        }
        match pivot.kind {
            SurfaceKind::FrontCover => {
                if model.group_animating() {
                    return false;
                }
                if model.page_pivots().any(|p| p.turned) {
                    return false;
                }
            }
            SurfaceKind::Page(index) => {
                // Successor sentinel: the last page's successor counts
                // as permanently closed.
                if index + 1 < model.config().page_count
                    && model.pivot(PivotId(id.0 + 1)).turned
                {
                    return false;
                }
            }
            SurfaceKind::BackCover => unreachable!(),
        }

        let (base_angle, base_z, node) = {
            let pivot = model.pivot(id);
            (pivot.base_angle, pivot.base_z, pivot.node)
        };
        let (duration, is_cover) = match model.pivot(id).kind {
            SurfaceKind::FrontCover => (COVER_TURN_SECS, true),
            _ => (PAGE_TURN_SECS, false),
        };
        self.dispatch(
            model,
            AnimTarget::Pivot(id),
            node,
            vec![
                (Channel::RotationY, base_angle),
                (Channel::PositionZ, base_z),
            ],
            duration,
            Easing::Power2InOut,
            animator,
        );
        let container = model.container();
        if is_cover {
            self.dispatch(
                model,
                AnimTarget::GroupTilt,
                container,
                vec![(Channel::RotationX, 0.0)],
                COVER_TURN_SECS,
                Easing::Power2Out,
                animator,
            );
        }
        model.pivot_mut(id).turned = false;
        true
    }

    /// Open the next unturned surface front to back.
    pub fn advance_forward(
        &mut self,
        model: &mut BookModel,
        animator: &mut dyn Animator,
    ) -> bool {
        let next = model
            .turnable_pivots()
            .find(|p| !p.turned)
            .map(|p| p.id);
        match next {
            Some(id) => self.open(model, id, animator),
            None => false,
        }
    }

    /// Close the most recently opened surface.
    pub fn advance_backward(
        &mut self,
        model: &mut BookModel,
        animator: &mut dyn Animator,
    ) -> bool {
        let last_open = model
            .turnable_pivots()
            .filter(|p| p.turned)
            .last()
            .map(|p| p.id);
        match last_open {
            Some(id) => self.close(model, id, animator),
            None => false,
        }
    }

    /// Toggle the pivot owning a hit node, if the node belongs to one.
    pub fn interact(
        &mut self,
        model: &mut BookModel,
        hit: NodeId,
        animator: &mut dyn Animator,
    ) -> bool {
        let Some(id) = model.resolve_pivot(hit) else {
            return false;
        };
        if model.pivot(id).turned {
            self.close(model, id, animator)
        } else {
            self.open(model, id, animator)
        }
    }

    /// Host signal that a dispatched transition finished. Commits the
    /// end channel values to the node transform and clears the guard.
    pub fn complete(&mut self, model: &mut BookModel, target: AnimTarget) {
        let Some(position) = self.pending.iter().position(|p| p.target == target) else {
            return;
        };
        let pending = self.pending.remove(position);
        let transform = &mut model.graph.node_mut(pending.node).transform;
        for (channel, value) in pending.channels {
            match channel {
                Channel::RotationX => transform.rotation.x = value,
                Channel::RotationY => transform.rotation.y = value,
                Channel::PositionZ => transform.position.z = value,
            }
        }
        match target {
            AnimTarget::Pivot(id) => model.pivot_mut(id).animating = false,
            AnimTarget::GroupTilt => model.set_group_animating(false),
        }
    }

    /// Targets with a transition still in flight, in dispatch order.
    pub fn pending_targets(&self) -> Vec<AnimTarget> {
        self.pending.iter().map(|p| p.target).collect()
    }

    fn dispatch(
        &mut self,
        model: &mut BookModel,
        target: AnimTarget,
        node: NodeId,
        channels: Vec<(Channel, f64)>,
        duration_secs: f64,
        easing: Easing,
        animator: &mut dyn Animator,
    ) {
        match target {
            AnimTarget::Pivot(id) => model.pivot_mut(id).animating = true,
            AnimTarget::GroupTilt => model.set_group_animating(true),
        }
        self.pending.push(Pending {
            target,
            node,
            channels: channels.clone(),
        });
        animator.animate(TransitionRequest {
            target,
            node,
            channels,
            duration_secs,
            easing,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::content::NoContent;
    use crate::config::BookConfig;

    #[derive(Default)]
    struct Recorder {
        requests: Vec<TransitionRequest>,
    }

    impl Animator for Recorder {
        fn animate(&mut self, request: TransitionRequest) {
            self.requests.push(request);
        }
    }

    fn model(pages: usize) -> BookModel {
        BookModel::build(BookConfig::default().with_page_count(pages), &NoContent).unwrap()
    }

    fn settle(controller: &mut PageTurnController, model: &mut BookModel) {
        for target in controller.pending_targets() {
            controller.complete(model, target);
        }
    }

    #[test]
    fn cover_opens_with_a_group_tilt() {
        let mut model = model(2);
        let mut controller = PageTurnController::new();
        let mut animator = Recorder::default();

        let cover = model.front_cover();
        assert!(controller.open(&mut model, cover, &mut animator));
        assert_eq!(animator.requests.len(), 2);
        assert_eq!(animator.requests[0].target, AnimTarget::Pivot(model.front_cover()));
        assert_eq!(animator.requests[1].target, AnimTarget::GroupTilt);
        assert_eq!(animator.requests[1].easing, Easing::Power2Out);
        assert!(model.pivot(model.front_cover()).turned);
    }

    #[test]
    fn pages_cannot_open_before_the_cover() {
        let mut model = model(2);
        let mut controller = PageTurnController::new();
        let mut animator = Recorder::default();

        let page = model.page(0);
        assert!(!controller.open(&mut model, page, &mut animator));
        assert!(animator.requests.is_empty());
    }

    #[test]
    fn back_cover_never_turns() {
        let mut model = model(1);
        let mut controller = PageTurnController::new();
        let mut animator = Recorder::default();
        let back = model.back_cover();

        assert!(!controller.open(&mut model, back, &mut animator));
        assert!(!controller.close(&mut model, back, &mut animator));
    }

    #[test]
    fn in_flight_pivot_rejects_further_requests() {
        let mut model = model(2);
        let mut controller = PageTurnController::new();
        let mut animator = Recorder::default();
        let cover = model.front_cover();

        assert!(controller.open(&mut model, cover, &mut animator));
        // Turned already, but even a close is rejected mid-flight.
        assert!(!controller.close(&mut model, cover, &mut animator));

        settle(&mut controller, &mut model);
        assert!(controller.close(&mut model, cover, &mut animator));
    }

    #[test]
    fn open_pages_fan_by_index() {
        let mut model = model(3);
        let mut controller = PageTurnController::new();
        let mut animator = Recorder::default();

        let cover = model.front_cover();
        controller.open(&mut model, cover, &mut animator);
        settle(&mut controller, &mut model);
        let page0 = model.page(0);
        controller.open(&mut model, page0, &mut animator);
        settle(&mut controller, &mut model);
        let page1 = model.page(1);
        controller.open(&mut model, page1, &mut animator);
        settle(&mut controller, &mut model);

        let angle = |request: &TransitionRequest| {
            request
                .channels
                .iter()
                .find(|(c, _)| *c == Channel::RotationY)
                .map(|(_, v)| *v)
                .unwrap()
        };
        let page0 = angle(&animator.requests[2]);
        let page1 = angle(&animator.requests[3]);
        assert!((page1 - page0 - OPEN_ANGLE_STEP).abs() < 1e-12);
    }

    #[test]
    fn complete_commits_the_end_transform() {
        let mut model = model(1);
        let mut controller = PageTurnController::new();
        let mut animator = Recorder::default();
        let cover = model.front_cover();

        controller.open(&mut model, cover, &mut animator);
        settle(&mut controller, &mut model);

        let node = model.pivot(cover).node;
        let transform = &model.graph.node(node).transform;
        assert!((transform.rotation.y - OPEN_ANGLE).abs() < 1e-12);
        assert!((transform.position.z - COVER_OPEN_Z).abs() < 1e-12);
        let tilt = &model.graph.node(model.container()).transform;
        assert!((tilt.rotation.x - GROUP_TILT_X).abs() < 1e-12);
    }

    #[test]
    fn cover_close_requires_all_pages_closed() {
        let mut model = model(1);
        let mut controller = PageTurnController::new();
        let mut animator = Recorder::default();

        let cover = model.front_cover();
        let page = model.page(0);
        controller.open(&mut model, cover, &mut animator);
        settle(&mut controller, &mut model);
        controller.open(&mut model, page, &mut animator);
        settle(&mut controller, &mut model);

        assert!(!controller.close(&mut model, cover, &mut animator));
        assert!(controller.close(&mut model, page, &mut animator));
        settle(&mut controller, &mut model);
        assert!(controller.close(&mut model, cover, &mut animator));
    }

    #[test]
    fn interact_toggles_through_node_tags() {
        let mut model = model(1);
        let mut controller = PageTurnController::new();
        let mut animator = Recorder::default();
        let cover = model.front_cover();
        let panel = model.graph.children(model.pivot(cover).node)[0];

        assert!(controller.interact(&mut model, panel, &mut animator));
        assert!(model.pivot(cover).turned);
        settle(&mut controller, &mut model);
        assert!(controller.interact(&mut model, panel, &mut animator));
        assert!(!model.pivot(cover).turned);
    }
}
