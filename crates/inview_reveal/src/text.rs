//! Staggered text reveals
//!
//! Splits a sentence into words and reveals each word with its own delay
//! derived from its index. Observation is container-level: one reading for
//! the whole sentence fans out to every word's transition, so detection is
//! shared and only the starts are staggered.
//!
//! Defaults mirror the classic word-reveal: 120ms between words, 40ms base
//! delay, 600ms per-word duration on a cubic-bezier(0.2, 0.65, 0.3, 0.9)
//! curve, words rising 20px as they fade in.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use smallvec::SmallVec;

use inview_animation::{
    ApplyFn, DisposalToken, Easing, RevealStyle, SchedulerHandle, TransitionId, TransitionRequest,
};
use inview_core::{ConfigError, ElementId, VisibilityState};
use inview_observer::{Observation, ViewportObserver};

/// One word of a split sentence
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordToken {
    pub text: String,
    pub index: usize,
}

/// Split a sentence into word tokens on whitespace
///
/// Pure and restartable: tokens carry their index, empty input yields no
/// tokens, and re-joining the token texts with single spaces reproduces the
/// sentence (modulo collapsed whitespace runs).
pub fn split_words(sentence: &str) -> Vec<WordToken> {
    sentence
        .split_whitespace()
        .enumerate()
        .map(|(index, text)| WordToken {
            text: text.to_string(),
            index,
        })
        .collect()
}

/// Order in which staggered words start
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StaggerDirection {
    /// Animate first to last
    #[default]
    Forward,
    /// Animate last to first
    Reverse,
    /// Animate from center outward
    FromCenter,
}

impl StaggerDirection {
    /// Number of stagger steps for the word at `index`
    pub fn steps_for_index(self, index: usize, total: usize) -> usize {
        match self {
            StaggerDirection::Forward => index,
            StaggerDirection::Reverse => total.saturating_sub(1).saturating_sub(index),
            StaggerDirection::FromCenter => {
                let center = total / 2;
                if index <= center {
                    center - index
                } else {
                    index - center
                }
            }
        }
    }
}

/// Hidden style for an unrevealed word
pub const WORD_HIDDEN: RevealStyle = RevealStyle::hidden().with_translate_y(20.0);

/// Create a text reveal builder for a sentence with the default stagger
pub fn text_reveal(sentence: impl AsRef<str>) -> TextRevealBuilder {
    TextRevealBuilder {
        words: split_words(sentence.as_ref()),
        stagger_ms: 120.0,
        child_delay_ms: 40.0,
        duration_ms: 600,
        easing: Easing::CubicBezier(0.2, 0.65, 0.3, 0.9),
        direction: StaggerDirection::Forward,
        once: true,
        threshold: 0.1,
    }
}

/// Builder for a staggered text reveal
pub struct TextRevealBuilder {
    words: Vec<WordToken>,
    stagger_ms: f32,
    child_delay_ms: f32,
    duration_ms: u32,
    easing: Easing,
    direction: StaggerDirection,
    once: bool,
    threshold: f32,
}

impl TextRevealBuilder {
    /// Delay between consecutive words, in milliseconds
    pub fn stagger_ms(mut self, stagger_ms: f32) -> Self {
        self.stagger_ms = stagger_ms;
        self
    }

    /// Base delay before the first word, in milliseconds
    pub fn child_delay_ms(mut self, child_delay_ms: f32) -> Self {
        self.child_delay_ms = child_delay_ms;
        self
    }

    /// Per-word transition duration, in milliseconds
    pub fn duration_ms(mut self, duration_ms: u32) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Per-word easing curve
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Order in which words start
    pub fn direction(mut self, direction: StaggerDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Whether the reveal plays once (default) or replays on re-entry
    pub fn once(mut self, once: bool) -> Self {
        self.once = once;
        self
    }

    /// Fraction of the container that must be on screen to trigger
    pub fn threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Mount the text reveal on its container element
    ///
    /// `apply` receives `(word_index, style)` for every style sample.
    pub fn mount(
        self,
        observer: &ViewportObserver,
        scheduler: &SchedulerHandle,
        container: ElementId,
        apply: impl Fn(usize, RevealStyle) + Send + Sync + 'static,
    ) -> Result<TextReveal, ConfigError> {
        let stagger_ms = ConfigError::check_delay(self.stagger_ms)?;
        let child_delay_ms = ConfigError::check_delay(self.child_delay_ms)?;

        let apply = Arc::new(apply);
        let word_count = self.words.len();

        // Per-word applied styles, so interrupted words resume mid-flight
        let applied: Vec<Arc<Mutex<RevealStyle>>> = (0..word_count)
            .map(|_| Arc::new(Mutex::new(WORD_HIDDEN)))
            .collect();

        // All words start hidden
        for index in 0..word_count {
            apply(index, WORD_HIDDEN);
        }

        let mut observation = observer.observe(container, self.threshold)?;

        let shared = Arc::new(TextShared {
            stagger_ms,
            child_delay_ms,
            duration_ms: self.duration_ms,
            easing: self.easing,
            direction: self.direction,
            once: self.once,
            state: Mutex::new(VisibilityState::Hidden),
            transitions: AtomicU64::new(0),
            pending: Mutex::new(SmallVec::new()),
            applied,
            scheduler: scheduler.clone(),
            token: DisposalToken::new(),
            apply,
        });

        let sink = shared.clone();
        observation.subscribe(move |intersecting| sink.on_reading(intersecting));

        Ok(TextReveal {
            words: self.words,
            shared,
            _observation: observation,
        })
    }
}

struct TextShared {
    stagger_ms: f32,
    child_delay_ms: f32,
    duration_ms: u32,
    easing: Easing,
    direction: StaggerDirection,
    once: bool,
    state: Mutex<VisibilityState>,
    transitions: AtomicU64,
    pending: Mutex<SmallVec<[TransitionId; 8]>>,
    applied: Vec<Arc<Mutex<RevealStyle>>>,
    scheduler: SchedulerHandle,
    token: DisposalToken,
    apply: Arc<dyn Fn(usize, RevealStyle) + Send + Sync>,
}

impl TextShared {
    fn delay_for_index(&self, index: usize) -> f32 {
        let steps = self.direction.steps_for_index(index, self.applied.len());
        self.child_delay_ms + self.stagger_ms * steps as f32
    }

    fn on_reading(self: &Arc<Self>, intersecting: bool) {
        let next = {
            let mut state = self.state.lock().unwrap();
            let next = state.apply_reading(intersecting, self.once);
            if next == *state {
                return;
            }
            *state = next;
            next
        };

        self.transitions.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(?next, words = self.applied.len(), "text reveal state changed");

        let mut pending = self.pending.lock().unwrap();
        for id in pending.drain(..) {
            self.scheduler.cancel(id);
        }

        // One container reading fans out to every word; only the starts
        // are staggered, and hiding collapses all words together.
        for (index, applied) in self.applied.iter().enumerate() {
            let from = *applied.lock().unwrap();
            let (to, delay_ms) = match next {
                VisibilityState::Visible => (RevealStyle::VISIBLE, self.delay_for_index(index)),
                VisibilityState::Hidden => (WORD_HIDDEN, 0.0),
            };

            let record = applied.clone();
            let forward = self.apply.clone();
            let apply: ApplyFn = Arc::new(move |style| {
                *record.lock().unwrap() = style;
                forward(index, style);
            });

            if let Some(id) = self.scheduler.schedule(TransitionRequest {
                from,
                to,
                delay_ms,
                duration_ms: self.duration_ms,
                easing: self.easing,
                token: self.token.clone(),
                apply,
            }) {
                pending.push(id);
            }
        }
    }
}

/// A mounted staggered text reveal
///
/// Dropping it unmounts the sentence: pending word transitions are
/// cancelled and the container observation is released.
pub struct TextReveal {
    words: Vec<WordToken>,
    shared: Arc<TextShared>,
    _observation: Observation,
}

impl TextReveal {
    /// The split words, in order
    pub fn words(&self) -> &[WordToken] {
        &self.words
    }

    /// Current visibility state of the container
    pub fn state(&self) -> VisibilityState {
        *self.shared.state.lock().unwrap()
    }

    /// Style most recently applied to the word at `index`
    pub fn word_style(&self, index: usize) -> Option<RevealStyle> {
        self.shared
            .applied
            .get(index)
            .map(|style| *style.lock().unwrap())
    }

    /// Total delay before the word at `index` starts revealing
    pub fn word_delay_ms(&self, index: usize) -> f32 {
        self.shared.delay_for_index(index)
    }

    /// Number of container state transitions so far
    pub fn transition_count(&self) -> u64 {
        self.shared.transitions.load(Ordering::Relaxed)
    }
}

impl Drop for TextReveal {
    fn drop(&mut self) {
        self.shared.token.dispose();
        let mut pending = self.shared.pending.lock().unwrap();
        for id in pending.drain(..) {
            self.shared.scheduler.cancel(id);
        }
        tracing::trace!("text reveal unmounted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inview_animation::TransitionScheduler;
    use inview_core::Rect;
    use inview_observer::BoundsProbe;

    const OFF_SCREEN: Rect = Rect::new(0.0, 2000.0, 600.0, 60.0);
    const ON_SCREEN: Rect = Rect::new(0.0, 300.0, 600.0, 60.0);

    #[test]
    fn test_split_round_trip() {
        let sentence = "We help brands find their voice through design, strategy, and innovation.";
        let tokens = split_words(sentence);

        assert_eq!(tokens.len(), 10);
        let rejoined = tokens
            .iter()
            .map(|token| token.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(rejoined, sentence);
    }

    #[test]
    fn test_split_indices_are_sequential() {
        let tokens = split_words("We help brands find their voice");
        assert_eq!(tokens.len(), 6);
        for (expected, token) in tokens.iter().enumerate() {
            assert_eq!(token.index, expected);
        }
    }

    #[test]
    fn test_split_collapses_whitespace_runs() {
        let tokens = split_words("  spaced \t out\nwords  ");
        let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["spaced", "out", "words"]);
    }

    #[test]
    fn test_split_empty_sentence() {
        assert!(split_words("").is_empty());
        assert!(split_words("   ").is_empty());
    }

    #[test]
    fn test_stagger_steps_forward() {
        let dir = StaggerDirection::Forward;
        assert_eq!(dir.steps_for_index(0, 5), 0);
        assert_eq!(dir.steps_for_index(4, 5), 4);
    }

    #[test]
    fn test_stagger_steps_reverse() {
        let dir = StaggerDirection::Reverse;
        assert_eq!(dir.steps_for_index(0, 5), 4);
        assert_eq!(dir.steps_for_index(4, 5), 0);
    }

    #[test]
    fn test_stagger_steps_from_center() {
        let dir = StaggerDirection::FromCenter;
        // For 5 items, center is index 2
        assert_eq!(dir.steps_for_index(2, 5), 0);
        assert_eq!(dir.steps_for_index(1, 5), 1);
        assert_eq!(dir.steps_for_index(3, 5), 1);
        assert_eq!(dir.steps_for_index(0, 5), 2);
        assert_eq!(dir.steps_for_index(4, 5), 2);
    }

    struct Fixture {
        probe: Arc<BoundsProbe>,
        observer: ViewportObserver,
        scheduler: TransitionScheduler,
        container: ElementId,
    }

    fn fixture() -> Fixture {
        let probe = Arc::new(BoundsProbe::new(Rect::new(0.0, 0.0, 1000.0, 800.0)));
        let observer = ViewportObserver::new(probe.clone());
        let container = ElementId::new(1);
        probe.update_bounds(container, OFF_SCREEN);
        Fixture {
            probe,
            observer,
            scheduler: TransitionScheduler::new(),
            container,
        }
    }

    fn settle(scheduler: &TransitionScheduler) {
        for _ in 0..300 {
            scheduler.tick(16.0);
        }
    }

    #[test]
    fn test_word_delays_follow_index() {
        let f = fixture();
        let text = text_reveal("We help brands find their voice")
            .mount(&f.observer, &f.scheduler.handle(), f.container, |_, _| {})
            .unwrap();

        assert_eq!(text.words().len(), 6);
        for (index, expected) in [40.0, 160.0, 280.0, 400.0, 520.0, 640.0]
            .into_iter()
            .enumerate()
        {
            assert!((text.word_delay_ms(index) - expected).abs() < 1e-4);
        }
    }

    #[test]
    fn test_words_start_hidden_and_reveal_together() {
        let f = fixture();
        let revealed: Arc<Mutex<Vec<usize>>> = Arc::new(Mutex::new(Vec::new()));

        let sink = revealed.clone();
        let text = text_reveal("find your voice")
            .mount(
                &f.observer,
                &f.scheduler.handle(),
                f.container,
                move |index, style| {
                    if style.opacity >= 1.0 {
                        sink.lock().unwrap().push(index);
                    }
                },
            )
            .unwrap();

        for index in 0..3 {
            assert_eq!(text.word_style(index), Some(WORD_HIDDEN));
        }

        // One container crossing reveals every word
        f.probe.update_bounds(f.container, ON_SCREEN);
        settle(&f.scheduler);

        for index in 0..3 {
            assert_eq!(text.word_style(index), Some(RevealStyle::VISIBLE));
        }
        // Words finish in stagger order
        assert_eq!(*revealed.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_stagger_orders_word_starts() {
        let f = fixture();
        let text = text_reveal("one two three")
            .mount(&f.observer, &f.scheduler.handle(), f.container, |_, _| {})
            .unwrap();

        f.probe.update_bounds(f.container, ON_SCREEN);

        // 100ms in: word 0 (delay 40) has started, word 1 (delay 160) has not
        f.scheduler.tick(100.0);
        assert!(text.word_style(0).unwrap().opacity > 0.0);
        assert_eq!(text.word_style(1), Some(WORD_HIDDEN));

        f.scheduler.tick(100.0);
        assert!(text.word_style(1).unwrap().opacity > 0.0);
    }

    #[test]
    fn test_unmount_cancels_staggered_words() {
        let f = fixture();
        let applications = Arc::new(Mutex::new(0usize));

        let counter = applications.clone();
        let text = text_reveal("never shown words")
            .mount(
                &f.observer,
                &f.scheduler.handle(),
                f.container,
                move |_, _| {
                    *counter.lock().unwrap() += 1;
                },
            )
            .unwrap();

        f.probe.update_bounds(f.container, ON_SCREEN);
        let before_drop = *applications.lock().unwrap();
        drop(text);

        settle(&f.scheduler);
        assert_eq!(*applications.lock().unwrap(), before_drop);
        assert_eq!(f.scheduler.transition_count(), 0);
    }

    #[test]
    fn test_once_latch_on_container() {
        let f = fixture();
        let text = text_reveal("stay visible")
            .mount(&f.observer, &f.scheduler.handle(), f.container, |_, _| {})
            .unwrap();

        f.probe.update_bounds(f.container, ON_SCREEN);
        settle(&f.scheduler);
        f.probe.update_bounds(f.container, OFF_SCREEN);
        settle(&f.scheduler);

        assert_eq!(text.state(), VisibilityState::Visible);
        assert_eq!(text.word_style(0), Some(RevealStyle::VISIBLE));
        assert_eq!(text.transition_count(), 1);
    }

    #[test]
    fn test_repeatable_hides_words_again() {
        let f = fixture();
        let text = text_reveal("in and out")
            .once(false)
            .mount(&f.observer, &f.scheduler.handle(), f.container, |_, _| {})
            .unwrap();

        f.probe.update_bounds(f.container, ON_SCREEN);
        settle(&f.scheduler);
        f.probe.update_bounds(f.container, OFF_SCREEN);
        settle(&f.scheduler);

        assert_eq!(text.state(), VisibilityState::Hidden);
        for index in 0..3 {
            assert_eq!(text.word_style(index), Some(WORD_HIDDEN));
        }
    }
}
