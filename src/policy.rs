// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Eligibility of unattended "turn on" requests.

use std::fmt;

use chrono::{DateTime, TimeZone, Timelike};

use crate::daylight::{DaylightGate, SunsetProvider};
use crate::error::Result;

/// Local hour before which the light is never turned on automatically.
pub const EARLIEST_AUTO_ON_HOUR: u32 = 17;

/// Why an automatic turn-on was allowed or refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EligibilityReason {
    /// The request was forced; all checks were bypassed.
    Forced,
    /// The light is already on.
    AlreadyOn,
    /// It is earlier than [`EARLIEST_AUTO_ON_HOUR`].
    TimeWindowClosed,
    /// More than fifteen minutes of daylight remain.
    DaylightSufficient,
    /// All checks passed.
    Eligible,
}

impl fmt::Display for EligibilityReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Forced => "forced",
            Self::AlreadyOn => "light is already on",
            Self::TimeWindowClosed => "too early in the day",
            Self::DaylightSufficient => "still enough natural light",
            Self::Eligible => "eligible",
        })
    }
}

/// Outcome of [`may_auto_turn_on`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EligibilityDecision {
    /// Whether the turn-on may proceed.
    pub allowed: bool,
    /// The rule that decided.
    pub reason: EligibilityReason,
}

impl EligibilityDecision {
    const fn allow(reason: EligibilityReason) -> Self {
        Self {
            allowed: true,
            reason,
        }
    }

    const fn deny(reason: EligibilityReason) -> Self {
        Self {
            allowed: false,
            reason,
        }
    }
}

/// Decides whether an unattended turn-on may proceed.
///
/// Rules, first match wins:
/// 1. `forced` always allows.
/// 2. A light that is already on is left alone.
/// 3. Nothing happens before 17:00 in `now`'s time zone.
/// 4. The daylight gate decides; the provider is only contacted here.
///
/// # Errors
///
/// Returns `Error::DaylightProviderUnavailable` if the gate's provider fails.
pub async fn may_auto_turn_on<Tz, P>(
    now: &DateTime<Tz>,
    forced: bool,
    currently_on: bool,
    daylight: &DaylightGate<P>,
) -> Result<EligibilityDecision>
where
    Tz: TimeZone,
    P: SunsetProvider,
{
    if forced {
        return Ok(EligibilityDecision::allow(EligibilityReason::Forced));
    }
    if currently_on {
        return Ok(EligibilityDecision::deny(EligibilityReason::AlreadyOn));
    }
    if now.hour() < EARLIEST_AUTO_ON_HOUR {
        return Ok(EligibilityDecision::deny(
            EligibilityReason::TimeWindowClosed,
        ));
    }
    if daylight.sufficient_daylight_remains(now).await? {
        return Ok(EligibilityDecision::deny(
            EligibilityReason::DaylightSufficient,
        ));
    }
    Ok(EligibilityDecision::allow(EligibilityReason::Eligible))
}

#[cfg(test)]
mod tests {
    use chrono::FixedOffset;

    use super::*;
    use crate::daylight::testing::FixedSunset;
    use crate::error::Error;

    fn at_hour(hour: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 14, hour, 5, 0)
            .unwrap()
    }

    fn gate_with_sunset_in(now: &DateTime<FixedOffset>, secs: i64) -> DaylightGate<FixedSunset> {
        DaylightGate::new(
            Some(FixedSunset::at(now.timestamp() + secs)),
            Some("Lisbon".to_string()),
        )
    }

    #[tokio::test]
    async fn forced_wins_regardless_of_time_and_daylight() {
        for hour in [3, 12, 16, 17, 23] {
            let now = at_hour(hour);
            for on in [false, true] {
                let gate = gate_with_sunset_in(&now, 7200);
                let decision = may_auto_turn_on(&now, true, on, &gate).await.unwrap();
                assert_eq!(decision, EligibilityDecision::allow(EligibilityReason::Forced));
                assert_eq!(gate.provider_calls(), 0);
            }
        }
    }

    #[tokio::test]
    async fn already_on_is_refused() {
        let now = at_hour(20);
        let gate = gate_with_sunset_in(&now, -600);
        let decision = may_auto_turn_on(&now, false, true, &gate).await.unwrap();
        assert!(!decision.allowed);
        assert_eq!(decision.reason, EligibilityReason::AlreadyOn);
    }

    #[tokio::test]
    async fn before_five_pm_is_refused_even_when_dark() {
        for hour in 0..EARLIEST_AUTO_ON_HOUR {
            let now = at_hour(hour);
            let gate = gate_with_sunset_in(&now, -3600);
            let decision = may_auto_turn_on(&now, false, false, &gate).await.unwrap();
            assert_eq!(decision.reason, EligibilityReason::TimeWindowClosed);
            assert!(!decision.allowed);
            assert_eq!(gate.provider_calls(), 0);
        }
    }

    #[tokio::test]
    async fn daylight_decides_after_five_pm() {
        let now = at_hour(17);
        let decision = may_auto_turn_on(&now, false, false, &gate_with_sunset_in(&now, 3600))
            .await
            .unwrap();
        assert_eq!(
            decision,
            EligibilityDecision::deny(EligibilityReason::DaylightSufficient)
        );

        let decision = may_auto_turn_on(&now, false, false, &gate_with_sunset_in(&now, 600))
            .await
            .unwrap();
        assert_eq!(
            decision,
            EligibilityDecision::allow(EligibilityReason::Eligible)
        );
    }

    #[tokio::test]
    async fn unconfigured_daylight_allows_in_the_evening() {
        let now = at_hour(19);
        let gate = DaylightGate::<FixedSunset>::unconfigured();
        let decision = may_auto_turn_on(&now, false, false, &gate).await.unwrap();
        assert!(decision.allowed);
        assert_eq!(decision.reason, EligibilityReason::Eligible);
    }

    #[tokio::test]
    async fn provider_failure_is_an_error() {
        let now = at_hour(18);
        let gate = DaylightGate::new(Some(FixedSunset::failing()), Some("Lisbon".to_string()));
        let err = may_auto_turn_on(&now, false, false, &gate).await.unwrap_err();
        assert!(matches!(err, Error::DaylightProviderUnavailable(_)));
    }
}
