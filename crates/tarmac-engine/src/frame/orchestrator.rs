use crate::binding::LayoutId;
use crate::device::{Acquired, SkipReason};
use crate::error::EngineError;
use crate::overlay::Overlay;

use super::{validate_draws, DrawCall, DrawResources};

/// Consecutive skipped frames before a warning is logged.
const SKIP_WARN_THRESHOLD: u32 = 120;

/// Inputs of one scene pass.
#[derive(Debug, Clone, Copy)]
pub struct PassDesc<'a> {
    pub clear: wgpu::Color,
    pub draws: &'a [DrawCall],
}

/// Where frames come from and how a pass is recorded.
///
/// `acquire` must not record or submit anything; a skipped frame leaves the
/// queue untouched.
pub trait FrameBackend: DrawResources {
    type Frame;

    /// Layouts the bound pipeline expects, by group index.
    fn pipeline_layouts(&self) -> &[LayoutId];

    fn acquire(&mut self) -> Result<Acquired<Self::Frame>, EngineError>;

    /// Records the pass, submits it and presents/releases the frame.
    /// Returns the number of draw calls issued.
    fn encode_and_submit(
        &mut self,
        frame: Self::Frame,
        pass: &PassDesc<'_>,
        overlay: &dyn Overlay,
    ) -> Result<usize, EngineError>;
}

/// Counters kept across frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub presented: u64,
    pub skipped: u64,
    pub draw_calls: u64,
    pub consecutive_skips: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Presented { draw_calls: usize },
    Skipped(SkipReason),
}

/// Drives the per-frame protocol against a backend.
#[derive(Debug)]
pub struct FrameOrchestrator {
    clear: wgpu::Color,
    stats: FrameStats,
}

impl FrameOrchestrator {
    pub fn new(clear: wgpu::Color) -> Self {
        Self {
            clear,
            stats: FrameStats::default(),
        }
    }

    pub fn clear_color(&self) -> wgpu::Color {
        self.clear
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Renders one frame.
    ///
    /// Draws are validated first; a rejected list returns an error before a
    /// frame is acquired. A frame that cannot be rendered is skipped without
    /// creating an encoder.
    pub fn render<B: FrameBackend>(
        &mut self,
        backend: &mut B,
        draws: &[DrawCall],
        overlay: &dyn Overlay,
    ) -> Result<FrameOutcome, EngineError> {
        validate_draws(&*backend, backend.pipeline_layouts(), draws)?;

        let frame = match backend.acquire()? {
            Acquired::Frame(frame) => frame,
            Acquired::Skip(reason) => {
                self.note_skip(reason);
                return Ok(FrameOutcome::Skipped(reason));
            }
        };

        let pass = PassDesc {
            clear: self.clear,
            draws,
        };
        let draw_calls = backend.encode_and_submit(frame, &pass, overlay)?;

        self.stats.presented += 1;
        self.stats.draw_calls += draw_calls as u64;
        self.stats.consecutive_skips = 0;
        Ok(FrameOutcome::Presented { draw_calls })
    }

    fn note_skip(&mut self, reason: SkipReason) {
        self.stats.skipped += 1;
        self.stats.consecutive_skips += 1;
        log::debug!("frame skipped: {reason:?}");
        if self.stats.consecutive_skips == SKIP_WARN_THRESHOLD {
            log::warn!("{SKIP_WARN_THRESHOLD} consecutive frames skipped (last: {reason:?})");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::BindGroupShape;
    use crate::error::ConfigError;
    use crate::frame::draw::tests::{fake, layout, FakeResources};
    use crate::frame::BindGroupHandle;
    use crate::geometry::MeshHandle;
    use crate::overlay::NoOverlay;

    /// Backend that replays scripted acquisitions and records submissions.
    struct ScriptedBackend {
        resources: FakeResources,
        layouts: Vec<LayoutId>,
        script: Vec<Acquired<u32>>,
        acquired: usize,
        submissions: Vec<(u32, usize)>,
    }

    impl ScriptedBackend {
        fn new(script: Vec<Acquired<u32>>) -> Self {
            Self {
                resources: fake(),
                layouts: vec![layout()],
                script,
                acquired: 0,
                submissions: Vec::new(),
            }
        }
    }

    impl DrawResources for ScriptedBackend {
        fn index_count(&self, mesh: MeshHandle) -> Option<u32> {
            self.resources.index_count(mesh)
        }

        fn bind_group_shape(&self, group: BindGroupHandle) -> Option<&BindGroupShape> {
            self.resources.bind_group_shape(group)
        }
    }

    impl FrameBackend for ScriptedBackend {
        type Frame = u32;

        fn pipeline_layouts(&self) -> &[LayoutId] {
            &self.layouts
        }

        fn acquire(&mut self) -> Result<Acquired<u32>, EngineError> {
            self.acquired += 1;
            if self.script.is_empty() {
                return Ok(Acquired::Frame(0));
            }
            Ok(self.script.remove(0))
        }

        fn encode_and_submit(
            &mut self,
            frame: u32,
            pass: &PassDesc<'_>,
            _overlay: &dyn Overlay,
        ) -> Result<usize, EngineError> {
            self.submissions.push((frame, pass.draws.len()));
            Ok(pass.draws.len())
        }
    }

    fn two_objects() -> Vec<DrawCall> {
        vec![
            DrawCall::new(MeshHandle(0), BindGroupHandle(1)).with_offsets(vec![0]),
            DrawCall::new(MeshHandle(0), BindGroupHandle(1)).with_offsets(vec![256]),
        ]
    }

    #[test]
    fn optimal_frame_is_submitted_once() {
        let mut backend = ScriptedBackend::new(vec![Acquired::Frame(7)]);
        let mut orch = FrameOrchestrator::new(wgpu::Color::BLACK);

        let outcome = orch.render(&mut backend, &two_objects(), &NoOverlay).unwrap();
        assert_eq!(outcome, FrameOutcome::Presented { draw_calls: 2 });
        assert_eq!(backend.submissions, vec![(7, 2)]);
        assert_eq!(orch.stats().presented, 1);
        assert_eq!(orch.stats().draw_calls, 2);
    }

    #[test]
    fn skipped_frame_submits_nothing_and_next_frame_proceeds() {
        let mut backend = ScriptedBackend::new(vec![
            Acquired::Skip(SkipReason::Suboptimal),
            Acquired::Skip(SkipReason::Reconfigured),
            Acquired::Frame(3),
        ]);
        let mut orch = FrameOrchestrator::new(wgpu::Color::BLACK);
        let draws = two_objects();

        assert_eq!(
            orch.render(&mut backend, &draws, &NoOverlay).unwrap(),
            FrameOutcome::Skipped(SkipReason::Suboptimal)
        );
        assert!(backend.submissions.is_empty());

        assert_eq!(
            orch.render(&mut backend, &draws, &NoOverlay).unwrap(),
            FrameOutcome::Skipped(SkipReason::Reconfigured)
        );
        assert!(backend.submissions.is_empty());
        assert_eq!(orch.stats().consecutive_skips, 2);

        assert_eq!(
            orch.render(&mut backend, &draws, &NoOverlay).unwrap(),
            FrameOutcome::Presented { draw_calls: 2 }
        );
        assert_eq!(backend.submissions, vec![(3, 2)]);

        let stats = orch.stats();
        assert_eq!((stats.presented, stats.skipped, stats.consecutive_skips), (1, 2, 0));
    }

    #[test]
    fn invalid_draws_fail_before_acquire() {
        let mut backend = ScriptedBackend::new(vec![]);
        let mut orch = FrameOrchestrator::new(wgpu::Color::BLACK);
        let draws = [DrawCall::new(MeshHandle(0), BindGroupHandle(1))];

        let err = orch.render(&mut backend, &draws, &NoOverlay).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Config(ConfigError::DynamicOffsetCount { expected: 1, got: 0 })
        ));
        assert_eq!(backend.acquired, 0);
        assert!(backend.submissions.is_empty());
    }

    #[test]
    fn empty_draw_list_still_clears_and_presents() {
        let mut backend = ScriptedBackend::new(vec![]);
        let mut orch = FrameOrchestrator::new(wgpu::Color::BLACK);
        assert_eq!(
            orch.render(&mut backend, &[], &NoOverlay).unwrap(),
            FrameOutcome::Presented { draw_calls: 0 }
        );
        assert_eq!(backend.submissions, vec![(0, 0)]);
    }
}
