//! Player profile and heart regeneration
//!
//! Hearts gate episode starts. They regenerate lazily: nothing ticks in the
//! background, the elapsed time is settled whenever the profile is read.
//! `last_regen_time` keeps the leftover fraction of a period, so partial
//! progress toward the next heart survives a read that grants hearts.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::config::Config;
use crate::error::{Result, StoryError};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub hearts: u32,
    pub max_hearts: u32,
    /// Unix seconds the current regeneration period started at
    #[serde(default)]
    pub last_regen_time: f64,
}

impl UserProfile {
    /// Full hearts, timer never started
    pub fn new(max_hearts: u32) -> Self {
        Self {
            hearts: max_hearts,
            max_hearts,
            last_regen_time: 0.0,
        }
    }

    pub fn is_full(&self) -> bool {
        self.hearts >= self.max_hearts
    }

    /// Settle regeneration up to `now`. Returns true if hearts were granted.
    pub fn regenerate(&mut self, now: f64, period: f64) -> bool {
        // A non-positive period would write NaN into last_regen_time
        if self.is_full() || period.is_nan() || period <= 0.0 {
            return false;
        }

        let elapsed = now - self.last_regen_time;
        let to_add = (elapsed / period).floor();
        if to_add < 1.0 {
            return false;
        }

        // `as` saturates, so a timer that never started cannot overflow
        self.hearts = self.hearts.saturating_add(to_add as u32).min(self.max_hearts);
        self.last_regen_time = now - elapsed.rem_euclid(period);
        true
    }

    /// Seconds until the next heart, 0 when full
    pub fn time_to_next_heart(&self, now: f64, period: f64) -> f64 {
        if self.is_full() {
            return 0.0;
        }
        (period - (now - self.last_regen_time)).max(0.0)
    }
}

/// Profile plus the countdown shown to the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfileStatus {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub next_heart_in: f64,
}

/// Single-player profile persisted as `user.json`
pub struct ProfileStore {
    path: PathBuf,
    max_hearts: u32,
    regen_period: f64,
    clock: Arc<dyn Clock>,
}

impl ProfileStore {
    pub fn new(config: &Config, clock: Arc<dyn Clock>) -> Self {
        Self {
            path: config.user_file(),
            max_hearts: config.hearts.max_hearts,
            regen_period: config.regen_period(),
            clock,
        }
    }

    pub fn regen_period(&self) -> f64 {
        self.regen_period
    }

    fn default_profile(&self) -> UserProfile {
        UserProfile::new(self.max_hearts)
    }

    async fn load(&self) -> Result<UserProfile> {
        if !fs::try_exists(&self.path).await? {
            let profile = self.default_profile();
            info!(path = %self.path.display(), "Creating default profile");
            self.store(&profile).await?;
            return Ok(profile);
        }
        let bytes = fs::read(&self.path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn store(&self, profile: &UserProfile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(profile)?).await?;
        Ok(())
    }

    /// Load and regenerate as of `now`, persisting any granted hearts
    async fn read_at(&self, now: f64) -> Result<UserProfile> {
        let mut profile = self.load().await?;
        if profile.regenerate(now, self.regen_period) {
            debug!(hearts = profile.hearts, "Hearts regenerated");
            self.store(&profile).await?;
        }
        Ok(profile)
    }

    /// Current profile with regeneration applied
    pub async fn get_profile(&self) -> Result<UserProfile> {
        self.read_at(self.clock.now()).await
    }

    /// Profile and countdown, both computed at the same instant
    pub async fn status(&self) -> Result<ProfileStatus> {
        let now = self.clock.now();
        let profile = self.read_at(now).await?;
        Ok(ProfileStatus {
            profile,
            next_heart_in: profile.time_to_next_heart(now, self.regen_period),
        })
    }

    /// Seconds until the next heart regenerates
    pub async fn time_to_next_heart(&self) -> Result<f64> {
        Ok(self.status().await?.next_heart_in)
    }

    /// Spend one heart. Spending from full starts the regeneration timer.
    pub async fn debit_heart(&self) -> Result<UserProfile> {
        let now = self.clock.now();
        let mut profile = self.read_at(now).await?;

        if profile.hearts == 0 {
            warn!("Heart debit rejected, no hearts left");
            return Err(StoryError::NoHearts);
        }

        profile.hearts -= 1;
        if profile.hearts + 1 == profile.max_hearts {
            profile.last_regen_time = now;
        }
        self.store(&profile).await?;

        debug!(hearts = profile.hearts, "Heart spent");
        Ok(profile)
    }

    /// Overwrite with a full default profile
    pub async fn reset(&self) -> Result<UserProfile> {
        let profile = self.default_profile();
        self.store(&profile).await?;
        info!("Profile reset");
        Ok(profile)
    }

    /// Persist a profile as-is, bypassing regeneration
    pub async fn overwrite(&self, profile: &UserProfile) -> Result<()> {
        self.store(profile).await
    }
}
