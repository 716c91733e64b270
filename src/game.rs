//! Game controller: owns the option set, the mask store and the annotation
//! preference, and turns clicks into outcomes.
//!
//! Presentation lives behind [`Renderer`], persistence behind [`SettingsStore`].
//! The controller hands renderers immutable snapshots and never touches the DOM
//! itself, so the whole state machine runs natively under `cargo test`.
//!
//! Click handling:
//! - no armed word: every click is incorrect.
//! - armed, hit: correct feedback, the word leaves the option set, nothing is armed.
//! - armed, miss: generic incorrect feedback, the word stays armed.
//! - armed, mask unavailable: `MaskNotReady` is surfaced; no state changes.

use rand::Rng;

use crate::config::GameConfig;
use crate::coords::{CanvasRect, CanvasSize, map_to_canvas_pixel};
use crate::error::GameError;
use crate::hit;
use crate::lang::{AnnotationMap, RubySegment};
use crate::mask::{MaskImage, MaskStore, PendingMask};
use crate::options::OptionSet;
use crate::sample::sample;

/// What an option widget shows: the word, plus ruby segments when annotations are on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionLabel {
    pub word: String,
    pub ruby: Option<Vec<RubySegment>>,
}

/// Snapshot handed to [`Renderer::render`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameView<'a> {
    pub options: Vec<OptionLabel>,
    pub armed: Option<&'a str>,
    /// `Some(enabled)` when the language offers annotations, `None` otherwise.
    pub annotations: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Feedback {
    Correct(OptionLabel),
    Incorrect,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    Correct,
    Incorrect,
}

/// Pointer position in client (viewport) and page (document) coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerInput {
    pub client: (f64, f64),
    pub page: (f64, f64),
}

pub trait Renderer {
    /// Rebuild the option list and settings from scratch.
    fn render(&mut self, view: &GameView<'_>);
    fn set_armed(&mut self, armed: Option<&str>);
    fn remove_option(&mut self, word: &str);
    /// Transient popup at `anchor` (page coordinates).
    fn show_feedback(&mut self, feedback: &Feedback, anchor: (f64, f64));
    /// Blocking, user-visible error.
    fn show_error(&mut self, err: &GameError);
}

pub trait SettingsStore {
    fn get_flag(&self, key: &str) -> bool;
    fn set_flag(&mut self, key: &str, value: bool);
}

pub struct GameController<R, S> {
    config: GameConfig,
    options: OptionSet,
    solved: Vec<String>,
    masks: MaskStore,
    annotations: AnnotationMap,
    annotations_enabled: bool,
    renderer: R,
    settings: S,
}

impl<R: Renderer, S: SettingsStore> GameController<R, S> {
    pub fn new(config: GameConfig, canvas: CanvasSize, renderer: R, settings: S) -> Self {
        let annotations_enabled =
            config.lang.has_annotations() && settings.get_flag(config.settings_key);
        Self {
            config,
            options: OptionSet::new(),
            solved: Vec::new(),
            masks: MaskStore::new(canvas.width, canvas.height),
            annotations: AnnotationMap::new(),
            annotations_enabled,
            renderer,
            settings,
        }
    }

    /// Sample the option set from `words`, render it, and return the mask loads to run.
    pub fn start<G: Rng + ?Sized>(&mut self, words: &[String], rng: &mut G) -> Vec<PendingMask> {
        let picked = sample(words, self.config.option_count, rng);
        self.options.add_all(picked);
        self.solved.clear();
        log::info!(
            "Starting {} game with {} of {} words",
            self.config.lang.code(),
            self.options.len(),
            words.len()
        );
        let mut pending = Vec::with_capacity(self.options.len());
        for word in self.options.iter() {
            let url = self.config.lang.mask_url(word, self.config.local_masks);
            if let Some(p) = self.masks.request_load(word, &url) {
                pending.push(p);
            }
        }
        self.rerender();
        pending
    }

    /// Record a finished mask load. Loads for words no longer offered are kept but unused.
    pub fn mask_loaded(&mut self, pending: PendingMask, result: Result<MaskImage, GameError>) {
        let word = pending.word.clone();
        self.masks.complete(pending, result);
        if !self.options.contains(&word) {
            log::debug!("Mask for {word} arrived after it left the options");
            return;
        }
        // selected before its mask arrived
        if self.options.armed() == Some(word.as_str()) && self.masks.is_ready(&word) {
            let _ = self.masks.activate(&word);
        }
    }

    /// Re-request a mask whose load failed. Returns `None` if it is loading or loaded.
    pub fn retry_mask(&mut self, word: &str) -> Option<PendingMask> {
        let url = self.config.lang.mask_url(word, self.config.local_masks);
        self.masks.request_load(word, &url)
    }

    /// Arm `word` as the click target and activate its mask.
    ///
    /// The word stays armed even when its mask is unavailable; the error is
    /// shown and returned, and clicks keep reporting `MaskNotReady` until it loads.
    pub fn select(&mut self, word: &str) -> Result<(), GameError> {
        if let Err(err) = self.options.arm(word) {
            log::warn!("{err}");
            return Err(err);
        }
        self.renderer.set_armed(Some(word));
        if let Err(err) = self.masks.activate(word) {
            self.renderer.show_error(&err);
            return Err(err);
        }
        Ok(())
    }

    pub fn deselect(&mut self) {
        self.options.disarm();
        self.renderer.set_armed(None);
    }

    pub fn click(
        &mut self,
        pointer: PointerInput,
        rect: CanvasRect,
        size: CanvasSize,
    ) -> Result<ClickOutcome, GameError> {
        let (x, y) = map_to_canvas_pixel(pointer.client, rect, size);
        let Some(armed) = self.options.armed().map(str::to_owned) else {
            log::debug!("Clicked at {x:.1}, {y:.1} with nothing selected");
            self.renderer.show_feedback(&Feedback::Incorrect, pointer.page);
            return Ok(ClickOutcome::Incorrect);
        };

        if self.masks.active_word() != Some(armed.as_str()) {
            if let Err(err) = self.masks.activate(&armed) {
                self.renderer.show_error(&err);
                return Err(err);
            }
        }

        let hit = match hit::test(&self.masks, self.config.hit_rule, &armed, x, y) {
            Ok(hit) => hit,
            Err(err) => {
                self.renderer.show_error(&err);
                return Err(err);
            }
        };
        log::debug!("Clicked at {x:.1}, {y:.1} for {armed}: correct={hit}");

        if !hit {
            self.renderer.show_feedback(&Feedback::Incorrect, pointer.page);
            return Ok(ClickOutcome::Incorrect);
        }
        let label = self.label(&armed);
        self.renderer.show_feedback(&Feedback::Correct(label), pointer.page);
        self.options.remove(&armed);
        self.solved.push(armed.clone());
        self.renderer.remove_option(&armed);
        self.renderer.set_armed(None);
        if self.is_solved() {
            log::info!("All {} words found", self.solved.len());
        }
        Ok(ClickOutcome::Correct)
    }

    pub fn set_annotations(&mut self, annotations: AnnotationMap) {
        self.annotations = annotations;
        self.rerender();
    }

    /// Toggle ruby annotations, persist the choice, and re-render.
    /// Ignored for languages without annotations.
    pub fn set_annotations_enabled(&mut self, enabled: bool) {
        if !self.config.lang.has_annotations() {
            return;
        }
        self.annotations_enabled = enabled;
        self.settings.set_flag(self.config.settings_key, enabled);
        self.rerender();
    }

    pub fn annotations_enabled(&self) -> bool {
        self.annotations_enabled
    }

    pub fn options(&self) -> &OptionSet {
        &self.options
    }

    pub fn armed(&self) -> Option<&str> {
        self.options.armed()
    }

    pub fn solved(&self) -> &[String] {
        &self.solved
    }

    /// Every sampled word has been found.
    pub fn is_solved(&self) -> bool {
        !self.solved.is_empty() && self.options.is_empty()
    }

    pub fn masks(&self) -> &MaskStore {
        &self.masks
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn settings(&self) -> &S {
        &self.settings
    }

    pub fn label(&self, word: &str) -> OptionLabel {
        let ruby = if self.annotations_enabled {
            self.annotations.get(word).cloned()
        } else {
            None
        };
        OptionLabel { word: word.to_string(), ruby }
    }

    fn rerender(&mut self) {
        let options = self.options.iter().map(|w| self.label(w)).collect();
        let annotations = self.config.lang.has_annotations().then_some(self.annotations_enabled);
        let view = GameView { options, armed: self.options.armed(), annotations };
        self.renderer.render(&view);
    }
}
