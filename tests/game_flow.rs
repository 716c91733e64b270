// Click/selection scenarios driven through the public controller API with a
// recording renderer. Native-friendly: no wasm/browser APIs are touched.

use spot_the_word::config::GameConfig;
use spot_the_word::coords::{CanvasRect, CanvasSize};
use spot_the_word::game::{Feedback, GameView, OptionLabel, PointerInput};
use spot_the_word::lang::{AnnotationMap, Language, RubySegment};
use spot_the_word::mask::{MaskImage, PendingMask};
use spot_the_word::{ClickOutcome, GameController, GameError, Renderer, SettingsStore};

use rand::SeedableRng;
use rand::rngs::StdRng;

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Render { options: Vec<OptionLabel>, armed: Option<String>, annotations: Option<bool> },
    Armed(Option<String>),
    Removed(String),
    Feedback(Feedback, (f64, f64)),
    Error(GameError),
}

#[derive(Default)]
struct Recorder {
    events: Vec<Event>,
}

impl Recorder {
    fn errors(&self) -> Vec<&GameError> {
        self.events
            .iter()
            .filter_map(|e| if let Event::Error(err) = e { Some(err) } else { None })
            .collect()
    }

    fn last_feedback(&self) -> Option<&Feedback> {
        self.events.iter().rev().find_map(|e| if let Event::Feedback(f, _) = e { Some(f) } else { None })
    }

    fn last_render(&self) -> Option<&Event> {
        self.events.iter().rev().find(|e| matches!(e, Event::Render { .. }))
    }
}

impl Renderer for Recorder {
    fn render(&mut self, view: &GameView<'_>) {
        self.events.push(Event::Render {
            options: view.options.clone(),
            armed: view.armed.map(str::to_owned),
            annotations: view.annotations,
        });
    }
    fn set_armed(&mut self, armed: Option<&str>) {
        self.events.push(Event::Armed(armed.map(str::to_owned)));
    }
    fn remove_option(&mut self, word: &str) {
        self.events.push(Event::Removed(word.to_string()));
    }
    fn show_feedback(&mut self, feedback: &Feedback, anchor: (f64, f64)) {
        self.events.push(Event::Feedback(feedback.clone(), anchor));
    }
    fn show_error(&mut self, err: &GameError) {
        self.events.push(Event::Error(err.clone()));
    }
}

#[derive(Default)]
struct MemSettings {
    flag: bool,
    writes: usize,
}

impl SettingsStore for MemSettings {
    fn get_flag(&self, _key: &str) -> bool {
        self.flag
    }
    fn set_flag(&mut self, _key: &str, value: bool) {
        self.flag = value;
        self.writes += 1;
    }
}

const W: u32 = 40;
const H: u32 = 20;
const SIZE: CanvasSize = CanvasSize { width: W, height: H };
// displayed at half size
const RECT: CanvasRect = CanvasRect { left: 100.0, top: 50.0, width: 20.0, height: 10.0 };

/// Client coordinates that land on canvas pixel (x, y).
fn pixel(x: u32, y: u32) -> PointerInput {
    let client = (RECT.left + (x as f64 + 0.5) / 2.0, RECT.top + (y as f64 + 0.5) / 2.0);
    PointerInput { client, page: (client.0 + 3.0, client.1 + 400.0) }
}

/// Left half of the canvas is "dog", right half "cat".
fn mask_for(word: &str) -> MaskImage {
    match word {
        "dog" => MaskImage::from_fn(W, H, |x, _| x < W / 2),
        _ => MaskImage::from_fn(W, H, |x, _| x >= W / 2),
    }
}

fn new_game(words: &[&str]) -> GameController<Recorder, MemSettings> {
    let mut game =
        GameController::new(GameConfig::default(), SIZE, Recorder::default(), MemSettings::default());
    let list: Vec<String> = words.iter().map(|s| s.to_string()).collect();
    for p in game.start(&list, &mut StdRng::seed_from_u64(11)) {
        if p.word == "fox" {
            game.mask_loaded(p, Err(GameError::MaskLoad { word: "fox".into(), reason: "404".into() }));
        } else {
            let img = mask_for(&p.word);
            game.mask_loaded(p, Ok(img));
        }
    }
    game
}

#[test]
fn correct_click_removes_and_disarms() {
    let mut game = new_game(&["dog", "cat", "fox"]);
    game.select("dog").unwrap();
    let outcome = game.click(pixel(3, 3), RECT, SIZE);
    assert_eq!(outcome, Ok(ClickOutcome::Correct));
    assert!(!game.options().contains("dog"));
    assert_eq!(game.armed(), None);
    assert_eq!(game.solved(), ["dog".to_string()]);

    let r = game.renderer();
    assert_eq!(
        r.last_feedback(),
        Some(&Feedback::Correct(OptionLabel { word: "dog".into(), ruby: None }))
    );
    assert!(r.events.contains(&Event::Removed("dog".into())));
    assert_eq!(r.events.last(), Some(&Event::Armed(None)));
}

#[test]
fn feedback_is_anchored_at_page_coordinates() {
    let mut game = new_game(&["dog", "cat"]);
    game.select("dog").unwrap();
    let p = pixel(3, 3);
    game.click(p, RECT, SIZE).unwrap();
    let anchor = game.renderer().events.iter().find_map(|e| match e {
        Event::Feedback(_, a) => Some(*a),
        _ => None,
    });
    assert_eq!(anchor, Some(p.page));
}

#[test]
fn incorrect_click_keeps_word_armed() {
    let mut game = new_game(&["dog", "cat"]);
    game.select("cat").unwrap();
    let outcome = game.click(pixel(2, 2), RECT, SIZE);
    assert_eq!(outcome, Ok(ClickOutcome::Incorrect));
    assert!(game.options().contains("cat"));
    assert_eq!(game.armed(), Some("cat"));
    assert_eq!(game.renderer().last_feedback(), Some(&Feedback::Incorrect));
}

#[test]
fn failed_mask_surfaces_not_ready_and_changes_nothing() {
    let mut game = new_game(&["dog", "cat", "fox"]);
    assert_eq!(game.select("fox"), Err(GameError::MaskNotReady("fox".into())));
    assert_eq!(game.armed(), Some("fox"));
    let before: Vec<String> = game.options().words().to_vec();

    for (x, y) in [(0, 0), (30, 10), (39, 19)] {
        assert_eq!(game.click(pixel(x, y), RECT, SIZE), Err(GameError::MaskNotReady("fox".into())));
    }
    assert_eq!(game.options().words(), before.as_slice());
    assert_eq!(game.armed(), Some("fox"));
    // one error on selection, one per click; never a correct/incorrect popup
    assert_eq!(game.renderer().errors().len(), 4);
    assert_eq!(game.renderer().last_feedback(), None);
}

#[test]
fn failed_mask_can_be_retried() {
    let mut game = new_game(&["fox", "dog"]);
    let _ = game.select("fox");
    let pending = game.retry_mask("fox").expect("failed mask is retryable");
    assert!(game.retry_mask("fox").is_none());
    game.mask_loaded(pending, Ok(MaskImage::from_fn(W, H, |_, y| y < 5)));
    assert_eq!(game.click(pixel(10, 2), RECT, SIZE), Ok(ClickOutcome::Correct));
}

#[test]
fn click_with_nothing_armed_is_incorrect() {
    let mut game = new_game(&["dog"]);
    assert_eq!(game.click(pixel(3, 3), RECT, SIZE), Ok(ClickOutcome::Incorrect));
    assert_eq!(game.renderer().last_feedback(), Some(&Feedback::Incorrect));
    assert!(game.options().contains("dog"));
}

#[test]
fn solved_word_is_never_evaluated_again() {
    let mut game = new_game(&["dog", "cat"]);
    game.select("dog").unwrap();
    game.click(pixel(1, 1), RECT, SIZE).unwrap();
    // the dog region would still be a hit if the dog were still armed
    assert_eq!(game.click(pixel(1, 1), RECT, SIZE), Ok(ClickOutcome::Incorrect));
    assert_eq!(game.select("dog"), Err(GameError::NotAnOption("dog".into())));
    assert_eq!(game.armed(), None);
}

#[test]
fn switching_selection_switches_mask() {
    let mut game = new_game(&["dog", "cat"]);
    game.select("dog").unwrap();
    game.select("cat").unwrap();
    assert_eq!(game.armed(), Some("cat"));
    assert_eq!(game.click(pixel(1, 1), RECT, SIZE), Ok(ClickOutcome::Incorrect));
    assert_eq!(game.click(pixel(30, 1), RECT, SIZE), Ok(ClickOutcome::Correct));
    assert!(game.options().contains("dog"));
}

#[test]
fn clicks_outside_the_canvas_miss() {
    let mut game = new_game(&["dog"]);
    game.select("dog").unwrap();
    let outside = PointerInput { client: (RECT.left - 5.0, RECT.top + 1.0), page: (0.0, 0.0) };
    assert_eq!(game.click(outside, RECT, SIZE), Ok(ClickOutcome::Incorrect));
}

#[test]
fn threshold_rule_still_misses_off_canvas() {
    // lowest threshold the query string allows, over an empty mask
    let config = GameConfig::from_query("?threshold=1");
    let mut game = GameController::new(config, SIZE, Recorder::default(), MemSettings::default());
    for p in game.start(&["dog".to_string()], &mut StdRng::seed_from_u64(11)) {
        game.mask_loaded(p, Ok(MaskImage::from_fn(W, H, |_, _| false)));
    }
    game.select("dog").unwrap();
    let far = PointerInput { client: (-500.0, -500.0), page: (0.0, 0.0) };
    assert_eq!(game.click(far, RECT, SIZE), Ok(ClickOutcome::Incorrect));
    assert_eq!(game.click(pixel(3, 3), RECT, SIZE), Ok(ClickOutcome::Incorrect));
    assert!(game.options().contains("dog"));
    assert_eq!(game.armed(), Some("dog"));
    assert_eq!(game.renderer().last_feedback(), Some(&Feedback::Incorrect));
}

#[test]
fn late_load_for_removed_word_is_harmless() {
    let mut game = new_game(&["dog", "cat"]);
    game.select("dog").unwrap();
    game.click(pixel(1, 1), RECT, SIZE).unwrap();
    let events = game.renderer().events.len();
    // a stale completion for the solved word
    let stale = PendingMask { word: "dog".into(), url: "./masks/en/dog.png".into() };
    game.mask_loaded(stale, Ok(mask_for("dog")));
    assert!(!game.options().contains("dog"));
    assert_eq!(game.armed(), None);
    assert_eq!(game.renderer().events.len(), events);
    assert!(game.renderer().errors().is_empty());
}

#[test]
fn annotations_follow_the_preference() {
    let cfg = GameConfig { lang: Language::Ja, ..GameConfig::default() };
    let mut game = GameController::new(cfg, SIZE, Recorder::default(), MemSettings::default());
    let mut map = AnnotationMap::new();
    map.insert("犬".into(), vec![RubySegment { base: "犬".into(), annotation: "いぬ".into() }]);
    game.set_annotations(map);
    game.start(&["犬".to_string()], &mut StdRng::seed_from_u64(0));

    let Some(Event::Render { options, annotations, .. }) = game.renderer().last_render().cloned() else {
        panic!("expected a render");
    };
    assert_eq!(annotations, Some(false));
    assert_eq!(options[0].ruby, None);

    game.set_annotations_enabled(true);
    assert_eq!(game.settings().writes, 1);
    assert!(game.settings().flag);
    let Some(Event::Render { options, annotations, .. }) = game.renderer().last_render().cloned() else {
        panic!("expected a render");
    };
    assert_eq!(annotations, Some(true));
    assert_eq!(options[0].ruby.as_ref().map(|r| r[0].annotation.as_str()), Some("いぬ"));
}

#[test]
fn english_has_no_annotation_toggle() {
    let game = new_game(&["dog"]);
    let Some(Event::Render { annotations, .. }) = game.renderer().last_render() else {
        panic!("expected a render");
    };
    assert_eq!(*annotations, None);
}

#[test]
fn empty_word_list_starts_an_empty_game() {
    let game = new_game(&[]);
    assert!(game.options().is_empty());
    assert!(!game.is_solved());
}
