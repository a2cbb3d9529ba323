// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::api::{RemoteSticker, StickerApi, StickerApiError, StickerSet};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tess_core::UserId;

#[derive(Debug, Default)]
struct FakeState {
    next_file: u64,
    next_emoji: u64,
    sets: HashMap<String, StickerSet>,
    upload_failures: VecDeque<StickerApiError>,
    get_set_failures: VecDeque<StickerApiError>,
    uploads: Vec<(UserId, usize)>,
}

impl FakeState {
    fn next_emoji_id(&mut self) -> String {
        self.next_emoji += 1;
        format!("ce-{}", self.next_emoji)
    }
}

/// In-memory sticker service for tests.
///
/// Sets live in a map; unknown set names answer with the service's
/// "STICKERSET_INVALID" bad-request string, so the client's create-on-miss
/// path is exercised exactly as against the real service. Failures can be
/// scripted per operation to drive the retry paths.
#[derive(Clone, Default)]
pub struct FakeStickerApi {
    state: Arc<Mutex<FakeState>>,
}

impl FakeStickerApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue failures returned by the next upload calls, in order.
    pub fn fail_next_uploads(&self, errors: Vec<StickerApiError>) {
        self.state.lock().upload_failures.extend(errors);
    }

    /// Queue failures returned by the next get-set calls, in order.
    pub fn fail_next_get_set(&self, errors: Vec<StickerApiError>) {
        self.state.lock().get_set_failures.extend(errors);
    }

    /// Pre-create a set holding `count` stickers.
    pub fn seed_set(&self, name: &str, count: usize) {
        let mut state = self.state.lock();
        let stickers = (0..count)
            .map(|_| {
                let emoji = state.next_emoji_id();
                RemoteSticker { file_id: format!("seed-{emoji}"), custom_emoji_id: Some(emoji) }
            })
            .collect();
        state.sets.insert(
            name.to_string(),
            StickerSet { name: name.to_string(), title: "seeded".to_string(), stickers },
        );
    }

    pub fn set(&self, name: &str) -> Option<StickerSet> {
        self.state.lock().sets.get(name).cloned()
    }

    pub fn upload_count(&self) -> usize {
        self.state.lock().uploads.len()
    }
}

#[async_trait]
impl StickerApi for FakeStickerApi {
    async fn upload_sticker_file(
        &self,
        user_id: UserId,
        png: Vec<u8>,
    ) -> Result<String, StickerApiError> {
        let mut state = self.state.lock();
        if let Some(err) = state.upload_failures.pop_front() {
            return Err(err);
        }
        state.next_file += 1;
        state.uploads.push((user_id, png.len()));
        Ok(format!("file-{}", state.next_file))
    }

    async fn get_sticker_set(&self, name: &str) -> Result<StickerSet, StickerApiError> {
        let mut state = self.state.lock();
        if let Some(err) = state.get_set_failures.pop_front() {
            return Err(err);
        }
        state.sets.get(name).cloned().ok_or_else(|| {
            StickerApiError::BadRequest("Bad Request: STICKERSET_INVALID".to_string())
        })
    }

    async fn add_sticker_to_set(
        &self,
        _user_id: UserId,
        name: &str,
        file_id: &str,
    ) -> Result<(), StickerApiError> {
        let mut state = self.state.lock();
        let emoji = state.next_emoji_id();
        let set = state.sets.get_mut(name).ok_or_else(|| {
            StickerApiError::BadRequest("Bad Request: STICKERSET_INVALID".to_string())
        })?;
        set.stickers
            .push(RemoteSticker { file_id: file_id.to_string(), custom_emoji_id: Some(emoji) });
        Ok(())
    }

    async fn create_new_sticker_set(
        &self,
        _user_id: UserId,
        name: &str,
        title: &str,
        file_ids: &[String],
    ) -> Result<(), StickerApiError> {
        let mut state = self.state.lock();
        if state.sets.contains_key(name) {
            return Err(StickerApiError::BadRequest("set name occupied".to_string()));
        }
        let stickers = file_ids
            .iter()
            .map(|file_id| {
                let emoji = state.next_emoji_id();
                RemoteSticker { file_id: file_id.clone(), custom_emoji_id: Some(emoji) }
            })
            .collect();
        state.sets.insert(
            name.to_string(),
            StickerSet { name: name.to_string(), title: title.to_string(), stickers },
        );
        Ok(())
    }
}
