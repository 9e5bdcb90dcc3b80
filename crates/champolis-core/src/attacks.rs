//! GIF replies for the `attack` family of commands.
//!
//! The GIF file is a JSON object with an `attackGifs` array of URLs.

use std::{fs, path::Path};

use rand::{seq::SliceRandom, Rng};
use serde::Deserialize;

use crate::{domain::UserId, Result};

/// Command names that trigger an attack reply.
pub const ATTACK_COMMANDS: [&str; 4] = ["attack", "korose", "malhada", "jibo"];

#[derive(Clone, Debug, Default, Deserialize)]
pub struct AttackGifs {
    #[serde(rename = "attackGifs", default)]
    gifs: Vec<String>,
}

impl AttackGifs {
    pub fn load(path: &Path) -> Result<Self> {
        let txt = fs::read_to_string(path)?;
        Self::from_json(&txt)
    }

    pub fn from_json(txt: &str) -> Result<Self> {
        Ok(serde_json::from_str(txt)?)
    }

    pub fn is_empty(&self) -> bool {
        self.gifs.is_empty()
    }

    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        self.gifs.choose(rng).map(String::as_str)
    }

    /// Reply text: the target's mention, then the GIF on its own line.
    pub fn reply_for<R: Rng + ?Sized>(&self, target: UserId, rng: &mut R) -> Option<String> {
        self.pick(rng).map(|gif| format!("<@{}> \n{}", target.0, gif))
    }

    pub fn random_reply_for(&self, target: UserId) -> Option<String> {
        self.reply_for(target, &mut rand::thread_rng())
    }
}

/// Hint sent when an attack names nobody.
pub fn usage_hint(prefix: &str) -> String {
    format!("You need to mention someone! Example: `{prefix}attack @user`")
}
