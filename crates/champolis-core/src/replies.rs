//! Canned replies for the `bobiz` command.
//!
//! The replies file is a JSON object of sentence lists. The `words` list is the
//! fallback; any other key is a user id whose author gets their own list.

use std::{collections::HashMap, fs, path::Path};

use rand::{seq::SliceRandom, Rng};
use serde::Deserialize;

use crate::{domain::UserId, Result};

const FALLBACK_KEY: &str = "words";

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct Replies {
    lists: HashMap<String, Vec<String>>,
}

impl Replies {
    pub fn load(path: &Path) -> Result<Self> {
        let txt = fs::read_to_string(path)?;
        Self::from_json(&txt)
    }

    pub fn from_json(txt: &str) -> Result<Self> {
        Ok(serde_json::from_str(txt)?)
    }

    pub fn is_empty(&self) -> bool {
        self.lists.values().all(|l| l.is_empty())
    }

    /// Sentence list for `author`, falling back to the shared one.
    fn list_for(&self, author: UserId) -> Option<&[String]> {
        self.lists
            .get(&author.0.to_string())
            .filter(|l| !l.is_empty())
            .or_else(|| self.lists.get(FALLBACK_KEY))
            .map(Vec::as_slice)
    }

    pub fn pick<R: Rng + ?Sized>(&self, author: UserId, rng: &mut R) -> Option<&str> {
        self.list_for(author)?.choose(rng).map(String::as_str)
    }

    /// Full reply text, mentioning the author.
    pub fn reply_for<R: Rng + ?Sized>(&self, author: UserId, rng: &mut R) -> Option<String> {
        self.pick(author, rng)
            .map(|sentence| format!("<@{}>, {}", author.0, sentence))
    }

    /// `reply_for` with the thread-local RNG.
    pub fn random_reply_for(&self, author: UserId) -> Option<String> {
        self.reply_for(author, &mut rand::thread_rng())
    }
}
