//! The curve engine: control points in, tube mesh out.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, warn};
use tube_core::traits::Validate;
use tube_core::{Result, TubeError};
use tube_geometry::{
    HermitePathPlanner, InterpolationMode, PathPlanner, Polyline, RingMode, SplineEvaluator,
};
use tube_mesh::{build_segment_tubes, build_tube, TriangleMesh};

use crate::params::CurveParameters;
use crate::sink::MeshSink;
use crate::source::{ChangeCallback, ControlPointSource, Subscription};

/// Shared handle to a mesh sink.
pub type SharedMeshSink = Rc<RefCell<dyn MeshSink>>;

/// Keeps a tube mesh in sync with a control point source.
///
/// The engine is active when automatic update is on and both a source and a
/// sink are set. While active it holds one subscription on the source and
/// recomputes the mesh on every change notification and every setter call.
/// While idle it holds no subscription and the sink keeps whatever mesh it
/// last received.
///
/// Everything runs on the calling thread. Setters return recompute errors
/// directly; errors from notification-triggered recomputes are logged and
/// kept for [`CurveEngine::take_last_error`].
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use glam::DVec3;
/// use tube_engine::{ControlPointList, CurveEngine, MemoryMeshSink, InterpolationMode};
///
/// let points = Rc::new(ControlPointList::new(vec![DVec3::ZERO, DVec3::new(10.0, 0.0, 0.0)]));
/// let sink = Rc::new(RefCell::new(MemoryMeshSink::new()));
///
/// let mut engine = CurveEngine::new();
/// engine.set_interpolation_mode(InterpolationMode::None).unwrap();
/// engine.set_source(Some(points.clone())).unwrap();
/// engine.set_sink(Some(sink.clone())).unwrap();
/// engine.set_automatic_update(true).unwrap();
///
/// assert_eq!(sink.borrow().mesh().unwrap().triangle_count(), 76);
/// points.push(DVec3::new(10.0, 10.0, 0.0));
/// assert_eq!(sink.borrow().mesh().unwrap().triangle_count(), 2 * 76);
/// ```
pub struct CurveEngine {
    state: Rc<RefCell<EngineState>>,
}

struct EngineState {
    params: CurveParameters,
    automatic_update: bool,
    source: Option<Rc<dyn ControlPointSource>>,
    sink: Option<SharedMeshSink>,
    planner: Option<Box<dyn PathPlanner>>,
    subscription: Option<Subscription>,
    polyline: Polyline,
    mesh: Option<TriangleMesh>,
    last_error: Option<TubeError>,
    this: Weak<RefCell<EngineState>>,
}

impl CurveEngine {
    /// An idle engine with default parameters and the built-in Hermite planner.
    pub fn new() -> Self {
        Self::from_params(CurveParameters::default())
    }

    /// Start from loaded parameters.
    ///
    /// # Errors
    /// [`TubeError::Configuration`] if the parameters are invalid.
    pub fn with_parameters(params: CurveParameters) -> Result<Self> {
        params.validate()?;
        Ok(Self::from_params(params))
    }

    fn from_params(params: CurveParameters) -> Self {
        let state = Rc::new_cyclic(|this| {
            RefCell::new(EngineState {
                params,
                automatic_update: false,
                source: None,
                sink: None,
                planner: Some(Box::new(HermitePathPlanner::default())),
                subscription: None,
                polyline: Polyline::empty(),
                mesh: None,
                last_error: None,
                this: this.clone(),
            })
        });
        Self { state }
    }

    pub fn set_interpolation_mode(&mut self, mode: InterpolationMode) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.params.interpolation_mode = mode;
        state.refresh(false)
    }

    /// Legacy integer selector; unknown values select [`InterpolationMode::None`].
    pub fn set_interpolation_mode_index(&mut self, index: i64) -> Result<()> {
        self.set_interpolation_mode(InterpolationMode::from_index(index))
    }

    pub fn set_ring_mode(&mut self, ring_mode: RingMode) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.params.ring_mode = ring_mode;
        state.refresh(false)
    }

    /// # Errors
    /// [`TubeError::Configuration`] for a radius that is not positive and
    /// finite. The current radius is kept and nothing is recomputed.
    pub fn set_tube_radius(&mut self, radius: f64) -> Result<()> {
        self.update_params(|p| p.tube_radius = radius)
    }

    /// # Errors
    /// [`TubeError::Configuration`] for fewer than 3 sides.
    pub fn set_sides(&mut self, sides: usize) -> Result<()> {
        self.update_params(|p| p.sides = sides)
    }

    /// Zero is ignored. The value does not affect sampling density.
    pub fn set_number_of_intermediate_points(&mut self, count: usize) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if count > 0 {
            state.params.number_of_intermediate_points = count;
        }
        state.refresh(false)
    }

    /// Replace every parameter at once.
    pub fn set_parameters(&mut self, params: CurveParameters) -> Result<()> {
        params.validate()?;
        let mut state = self.state.borrow_mut();
        state.params = params;
        state.refresh(false)
    }

    pub fn set_automatic_update(&mut self, enabled: bool) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.automatic_update = enabled;
        state.refresh(false)
    }

    /// Switch to another source, releasing the subscription on the old one.
    pub fn set_source(&mut self, source: Option<Rc<dyn ControlPointSource>>) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.subscription = None;
        state.source = source;
        state.refresh(true)
    }

    pub fn set_sink(&mut self, sink: Option<SharedMeshSink>) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.sink = sink;
        state.refresh(false)
    }

    /// Planner used by [`InterpolationMode::HermiteSpline`]. With `None`,
    /// Hermite recomputes fail with [`TubeError::Collaborator`].
    pub fn set_path_planner(&mut self, planner: Option<Box<dyn PathPlanner>>) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.planner = planner;
        state.refresh(false)
    }

    /// Recompute now, whether or not automatic update is on.
    ///
    /// # Errors
    /// [`TubeError::Configuration`] without a source or sink, and any
    /// planner failure as [`TubeError::Collaborator`].
    pub fn recompute(&mut self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.source.is_none() {
            return Err(TubeError::configuration("no control point source set"));
        }
        if state.sink.is_none() {
            return Err(TubeError::configuration("no mesh sink set"));
        }
        state.recompute()
    }

    pub fn is_active(&self) -> bool {
        self.state.borrow().is_active()
    }

    pub fn parameters(&self) -> CurveParameters {
        self.state.borrow().params
    }

    pub fn automatic_update(&self) -> bool {
        self.state.borrow().automatic_update
    }

    /// Path used for the latest mesh.
    pub fn polyline(&self) -> Polyline {
        self.state.borrow().polyline.clone()
    }

    /// Latest mesh delivered to the sink.
    pub fn mesh(&self) -> Option<TriangleMesh> {
        self.state.borrow().mesh.clone()
    }

    /// Error from the latest failed notification-triggered recompute.
    pub fn take_last_error(&self) -> Option<TubeError> {
        self.state.borrow_mut().last_error.take()
    }

    fn update_params(&mut self, update: impl FnOnce(&mut CurveParameters)) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let mut params = state.params;
        update(&mut params);
        params.validate()?;
        state.params = params;
        state.refresh(false)
    }
}

impl Default for CurveEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CurveEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("CurveEngine")
            .field("params", &state.params)
            .field("automatic_update", &state.automatic_update)
            .field("has_source", &state.source.is_some())
            .field("has_sink", &state.sink.is_some())
            .field("subscription", &state.subscription)
            .finish()
    }
}

impl EngineState {
    fn is_active(&self) -> bool {
        self.automatic_update && self.source.is_some() && self.sink.is_some()
    }

    /// Bring the subscription in line with the active state and recompute
    /// when active. `resubscribe` forces a fresh subscription.
    fn refresh(&mut self, resubscribe: bool) -> Result<()> {
        if !self.is_active() {
            if self.subscription.take().is_some() {
                debug!("Curve engine idle, subscription released");
            }
            return Ok(());
        }

        if resubscribe || self.subscription.is_none() {
            self.subscription = None;
            let Some(source) = self.source.clone() else {
                return Ok(());
            };
            let subscription = Subscription::new(source, self.change_callback());
            debug!(id = ?subscription.id(), "Curve engine active, subscribed to source");
            self.subscription = Some(subscription);
        }
        self.recompute()
    }

    fn change_callback(&self) -> ChangeCallback {
        let this = self.this.clone();
        Rc::new(move || {
            let Some(state) = this.upgrade() else {
                return;
            };
            let Ok(mut state) = state.try_borrow_mut() else {
                warn!("Control points changed during a recompute, notification dropped");
                return;
            };
            if !state.is_active() {
                return;
            }
            if let Err(e) = state.recompute() {
                warn!(error = %e, "Recompute after control point change failed");
                state.last_error = Some(e);
            }
        })
    }

    fn recompute(&mut self) -> Result<()> {
        let (Some(source), Some(sink)) = (self.source.clone(), self.sink.clone()) else {
            return Ok(());
        };
        let params = self.params;
        let points = source.positions();

        let evaluator = match &self.planner {
            Some(planner) => SplineEvaluator::with_planner(planner.as_ref()),
            None => SplineEvaluator::new(),
        };
        let polyline = evaluator.evaluate(&points, params.interpolation_mode, params.ring_mode)?;
        if polyline.is_empty() {
            debug!(
                mode = ?params.interpolation_mode,
                ring_mode = ?params.ring_mode,
                control_points = points.len(),
                "Too few control points, keeping previous mesh"
            );
            return Ok(());
        }

        let config = params.tube_config();
        let mesh = match params.interpolation_mode {
            InterpolationMode::None => build_segment_tubes(&polyline.points, &config)?,
            InterpolationMode::CardinalSpline | InterpolationMode::HermiteSpline => {
                build_tube(&polyline, &config)?
            }
        };

        {
            let mut target = sink
                .try_borrow_mut()
                .map_err(|_| TubeError::collaborator("mesh sink is busy"))?;
            target.set_mesh(mesh.clone());
            if !target.is_attached() {
                target.attach();
            }
        }

        debug!(
            mode = ?params.interpolation_mode,
            ring_mode = ?params.ring_mode,
            control_points = points.len(),
            path_points = polyline.len(),
            closed = polyline.closed,
            triangles = mesh.triangle_count(),
            "Recomputed tube mesh"
        );
        self.polyline = polyline;
        self.mesh = Some(mesh);
        Ok(())
    }
}
