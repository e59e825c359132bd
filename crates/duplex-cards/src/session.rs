//! Print orchestration
//!
//! A session builds the sheets for one pass, lets layout settle for two
//! frames, fits every box, then hands the sheets to the print host after a
//! short delay. Only one session runs at a time.

use crate::deck::DeckSource;
use crate::fit::{FitParams, HelveticaMetrics, TextMeasure};
use crate::layout::{FitSummary, SheetLayout};
use crate::options::{PrintConfiguration, SheetOptions};
use crate::paginate::paginate;
use crate::pdf::write_pdf;
use crate::transform::pages_for_side;
use crate::types::{Card, FlashcardError, Result, Side};
use std::future::Future;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

/// Delay between fitting and dispatch, absorbs late layout jitter
pub const PRINT_DELAY: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Building,
    LayoutSettling,
    Fitting,
    Triggered,
}

/// Frame boundaries of the host's layout engine
pub trait FrameClock {
    fn next_frame(&self) -> impl Future<Output = ()> + Send;
}

/// Yields to the tokio scheduler once per frame
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFrameClock;

impl FrameClock for TokioFrameClock {
    async fn next_frame(&self) {
        tokio::task::yield_now().await;
    }
}

/// The host's print facility
pub trait PrintHost {
    fn print(&self, layout: &SheetLayout) -> impl Future<Output = Result<()>> + Send;
}

/// Prints by writing the sheets to a PDF file
#[derive(Debug, Clone)]
pub struct PdfFileHost {
    output_path: PathBuf,
}

impl PdfFileHost {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }
}

impl PrintHost for PdfFileHost {
    async fn print(&self, layout: &SheetLayout) -> Result<()> {
        write_pdf(layout, &self.output_path).await?;
        log::info!(
            "Wrote {} sheet(s) to {}",
            layout.sheets().len(),
            self.output_path.display()
        );
        Ok(())
    }
}

/// Result of a completed print
#[derive(Debug, Clone, PartialEq)]
pub struct PrintReport {
    pub side: Side,
    pub test_mode: bool,
    pub pages: usize,
    pub cards: usize,
    pub fit: FitSummary,
}

/// Synthetic alignment deck; every label marks which edge is up
pub fn test_deck(count: usize) -> Vec<Card> {
    (1..=count.max(1))
        .map(|n| {
            Card::new(
                format!("test-{n}"),
                format!("FRONT ({n})\n^ TOP"),
                format!("BACK ({n})\n^ TOP"),
            )
        })
        .collect()
}

pub struct PrintSession<D, C = TokioFrameClock, H = PdfFileHost> {
    deck: D,
    config: RwLock<PrintConfiguration>,
    fit_params: FitParams,
    measure: Arc<dyn TextMeasure + Send + Sync>,
    target: Arc<tokio::sync::Mutex<SheetLayout>>,
    clock: C,
    host: H,
    state: Mutex<SessionState>,
    busy: AtomicBool,
}

impl<D: DeckSource, H: PrintHost> PrintSession<D, TokioFrameClock, H> {
    pub fn new(deck: D, config: PrintConfiguration, sheet: &SheetOptions, host: H) -> Self {
        let target = Arc::new(tokio::sync::Mutex::new(SheetLayout::new(sheet)));
        Self::with_parts(deck, config, target, TokioFrameClock, host)
    }
}

impl<D: DeckSource, C: FrameClock, H: PrintHost> PrintSession<D, C, H> {
    pub fn with_parts(
        deck: D,
        config: PrintConfiguration,
        target: Arc<tokio::sync::Mutex<SheetLayout>>,
        clock: C,
        host: H,
    ) -> Self {
        Self {
            deck,
            config: RwLock::new(config),
            fit_params: FitParams::default(),
            measure: Arc::new(HelveticaMetrics),
            target,
            clock,
            host,
            state: Mutex::new(SessionState::Idle),
            busy: AtomicBool::new(false),
        }
    }

    pub fn with_fit_params(mut self, params: FitParams) -> Self {
        self.fit_params = params;
        self
    }

    pub fn with_measure(mut self, measure: Arc<dyn TextMeasure + Send + Sync>) -> Self {
        self.measure = measure;
        self
    }

    pub fn state(&self) -> SessionState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn configuration(&self) -> PrintConfiguration {
        self.config.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Takes effect from the next build
    pub fn set_configuration(&self, config: PrintConfiguration) {
        *self.config.write().unwrap_or_else(|e| e.into_inner()) = config;
    }

    pub fn render_target(&self) -> Arc<tokio::sync::Mutex<SheetLayout>> {
        Arc::clone(&self.target)
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    fn set_state(&self, state: SessionState) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = state;
    }

    /// Build, settle, fit and print one pass.
    ///
    /// Fails with `EmptyDeck` before touching the render target when a real
    /// print has no cards, and with `PrintInProgress` while another session
    /// is active.
    pub async fn run_print(&self, side: Side, test_mode: bool) -> Result<PrintReport> {
        let _guard = SessionGuard::claim(self).ok_or(FlashcardError::PrintInProgress)?;

        let config = PrintConfiguration {
            side,
            test_mode,
            ..self.configuration()
        };

        let cards = if test_mode {
            test_deck(config.test_card_count)
        } else {
            self.deck.deck_snapshot()
        };
        if cards.is_empty() {
            log::warn!("Nothing to print: the deck is empty");
            return Err(FlashcardError::EmptyDeck);
        }

        self.set_state(SessionState::Building);
        log::info!(
            "Building {} pass for {} card(s){}",
            side.name(),
            cards.len(),
            if test_mode { " (test)" } else { "" }
        );

        let pages = pages_for_side(paginate(&cards), side, &config);

        let mut target = self.target.lock().await;
        target.render(
            &pages,
            side,
            config.rotation_for(side),
            config.show_cut_guides,
            self.fit_params.base_size_pt,
        );

        self.set_state(SessionState::LayoutSettling);
        self.clock.next_frame().await;
        self.clock.next_frame().await;

        self.set_state(SessionState::Fitting);
        let fit = target.fit_all(self.measure.as_ref(), &self.fit_params);
        if fit.overflowing > 0 {
            log::info!(
                "{} box(es) still overflow at {}pt",
                fit.overflowing,
                self.fit_params.min_size_pt
            );
        }

        self.set_state(SessionState::Triggered);
        tokio::time::sleep(PRINT_DELAY).await;
        self.host.print(&target).await?;

        Ok(PrintReport {
            side,
            test_mode,
            pages: pages.len(),
            cards: cards.len(),
            fit,
        })
    }

    /// Run a print on its own task; the caller does not wait for it
    pub fn spawn_print(
        self: &Arc<Self>,
        side: Side,
        test_mode: bool,
    ) -> tokio::task::JoinHandle<Result<PrintReport>>
    where
        D: Send + Sync + 'static,
        C: Send + Sync + 'static,
        H: Send + Sync + 'static,
    {
        let session = Arc::clone(self);
        tokio::spawn(async move { session.run_print(side, test_mode).await })
    }
}

/// Holds the single session slot; releasing it returns the session to idle
struct SessionGuard<'a> {
    busy: &'a AtomicBool,
    state: &'a Mutex<SessionState>,
}

impl<'a> SessionGuard<'a> {
    fn claim<D, C, H>(session: &'a PrintSession<D, C, H>) -> Option<Self> {
        session
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(Self {
            busy: &session.busy,
            state: &session.state,
        })
    }
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = SessionState::Idle;
        self.busy.store(false, Ordering::Release);
    }
}
