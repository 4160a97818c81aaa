use arrayvec::ArrayVec;

use crate::config::WorldConfig;
use crate::object::context::{ObjectContext, ObjectEvent};
use crate::object::error::LifecycleError;
use crate::object::state::GoState;
use crate::object::template::TransportData;
use crate::object::GameObjectInstance;

use super::{Arming, KindHooks, ObjectKind};

pub const MAX_STOP_FRAMES: usize = 9;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransportState {
    pub path_progress_ms: u64,
    pub state_update_timer_ms: u32,
    pub stop_frames: ArrayVec<u32, MAX_STOP_FRAMES>,
}

impl KindHooks for TransportData {
    /// Transports never leave `NotReady`; they only advance along the path.
    fn arm(
        &self,
        obj: &mut GameObjectInstance,
        diff: u32,
        cx: &mut ObjectContext<'_>,
    ) -> Result<Arming, LifecycleError> {
        if self.period_ms == 0 || obj.go_state != GoState::TransportActive {
            return Ok(Arming::Hold);
        }
        let ObjectKind::Transport(state) = &mut obj.kind else {
            return Ok(Arming::Hold);
        };
        state.path_progress_ms += u64::from(diff);
        if !state.stop_frames.is_empty() {
            state.state_update_timer_ms += diff;
            if state.state_update_timer_ms >= WorldConfig::TRANSPORT_STATE_UPDATE_MS {
                state.state_update_timer_ms -= WorldConfig::TRANSPORT_STATE_UPDATE_MS;
                cx.emit(ObjectEvent::TransportFrameRefresh);
            }
        }
        Ok(Arming::Hold)
    }
}
