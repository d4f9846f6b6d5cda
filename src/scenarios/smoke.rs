//! Smoke scenario: one user through the load flow to validate the environment.

use super::{load, SetupData};
use crate::client::{Session, Transport};
use crate::profile::Stage;

pub const STAGES: &[Stage] = &[Stage::secs(1, 1), Stage::mins(1, 1), Stage::secs(1, 0)];

pub async fn iteration<T: Transport>(session: &mut Session<'_, T>, setup: &SetupData) {
    load::iteration(session, setup).await;
}
