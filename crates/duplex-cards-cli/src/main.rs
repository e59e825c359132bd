use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use duplex_cards::{
    BackRotation, DeckStore, Orientation, PageOrder, PaperType, PdfFileHost, PositionMap,
    PrintConfiguration, PrintSession, SheetOptions, Side,
};
use log::LevelFilter;
use std::path::PathBuf;

mod logger;

#[derive(Parser)]
#[command(name = "dcards", about = "Printable flashcards for manual duplex", version)]
struct Cli {
    /// Log debug output (fit results per box)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print one side of the deck to a PDF
    Print {
        /// Deck file (.json, .csv, or Q:/A: text)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        overrides: PrintOverrides,

        /// Print the alignment test deck instead of real cards
        #[arg(long)]
        test: bool,

        /// Print configuration (JSON); flags override it
        #[arg(long)]
        config: Option<PathBuf>,

        /// Sheet geometry (JSON); flags override it
        #[arg(long)]
        sheet_config: Option<PathBuf>,

        /// Paper size
        #[arg(long, value_enum)]
        paper: Option<PaperArg>,

        /// Portrait sheets (default is landscape)
        #[arg(long)]
        portrait: bool,
    },

    /// Convert a CSV or Q:/A: deck to JSON
    Convert {
        /// Deck file (.json, .csv, or Q:/A: text)
        #[arg(short, long)]
        input: PathBuf,

        /// Output JSON file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Write the default print configuration
    Config {
        /// Output JSON file
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Print settings that take precedence over a loaded configuration
#[derive(Args)]
struct PrintOverrides {
    /// Which pass to print (default: front, or the configured side)
    #[arg(long, value_enum)]
    side: Option<SideArg>,

    /// Order of sheets on the back pass
    #[arg(long, value_enum)]
    page_order: Option<PageOrderArg>,

    /// Slot permutation on the back pass
    #[arg(long, value_enum)]
    position_map: Option<PositionMapArg>,

    /// Draw back text upside-down
    #[arg(long)]
    rotate_back: bool,

    /// Leave out the cut outlines
    #[arg(long)]
    no_guides: bool,

    /// Number of cards in the test deck
    #[arg(long)]
    test_cards: Option<usize>,
}

impl PrintOverrides {
    fn apply(&self, config: &mut PrintConfiguration) {
        if let Some(side) = self.side {
            config.side = side.into();
        }
        if let Some(order) = self.page_order {
            config.page_order = order.into();
        }
        if let Some(map) = self.position_map {
            config.position_map = map.into();
        }
        if self.rotate_back {
            config.back_rotation = BackRotation::Rotate180;
        }
        if self.no_guides {
            config.show_cut_guides = false;
        }
        if let Some(count) = self.test_cards {
            config.test_card_count = count;
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SideArg {
    Front,
    Back,
}

#[derive(Clone, Copy, ValueEnum)]
enum PageOrderArg {
    Same,
    Reverse,
}

#[derive(Clone, Copy, ValueEnum)]
enum PositionMapArg {
    Identity,
    SwapRows,
    SwapCols,
    Rotate180,
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    Letter,
    Legal,
    A4,
    A5,
}

impl From<SideArg> for Side {
    fn from(arg: SideArg) -> Self {
        match arg {
            SideArg::Front => Self::Front,
            SideArg::Back => Self::Back,
        }
    }
}

impl From<PageOrderArg> for PageOrder {
    fn from(arg: PageOrderArg) -> Self {
        match arg {
            PageOrderArg::Same => Self::Same,
            PageOrderArg::Reverse => Self::Reverse,
        }
    }
}

impl From<PositionMapArg> for PositionMap {
    fn from(arg: PositionMapArg) -> Self {
        match arg {
            PositionMapArg::Identity => Self::Identity,
            PositionMapArg::SwapRows => Self::SwapRows,
            PositionMapArg::SwapCols => Self::SwapCols,
            PositionMapArg::Rotate180 => Self::Rotate180,
        }
    }
}

impl From<PaperArg> for PaperType {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::Letter => Self::Letter,
            PaperArg::Legal => Self::Legal,
            PaperArg::A4 => Self::A4,
            PaperArg::A5 => Self::A5,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logger::CliLogger::new(level).init()?;

    match cli.command {
        Commands::Print {
            input,
            output,
            overrides,
            test,
            config,
            sheet_config,
            paper,
            portrait,
        } => {
            let mut print_config = match &config {
                Some(path) => PrintConfiguration::load(path).await?,
                None => PrintConfiguration::default(),
            };
            overrides.apply(&mut print_config);
            let side = print_config.side;
            let test_mode = test || print_config.test_mode;

            let mut sheet = match &sheet_config {
                Some(path) => SheetOptions::load(path).await?,
                None => SheetOptions::default(),
            };
            if let Some(paper) = paper {
                sheet.paper = paper.into();
            }
            if portrait {
                sheet.orientation = Orientation::Portrait;
            }
            sheet.validate()?;

            let cards = match &input {
                Some(path) => duplex_cards::load_deck(path).await?,
                None if test_mode => Vec::new(),
                None => bail!("--input is required unless printing the test deck"),
            };

            let session = PrintSession::new(
                DeckStore::from_cards(cards),
                print_config,
                &sheet,
                PdfFileHost::new(output.clone()),
            );
            let report = session.run_print(side, test_mode).await?;

            println!(
                "Printed {} side: {} card(s) on {} sheet(s) → {}",
                report.side.name(),
                report.cards,
                report.pages,
                output.display()
            );
            if report.fit.overflowing > 0 {
                println!(
                    "  {} box(es) did not fit at the minimum text size",
                    report.fit.overflowing
                );
            }
        }

        Commands::Convert { input, output } => {
            let cards = duplex_cards::load_deck(&input).await?;
            if cards.is_empty() {
                bail!("No cards found. Make sure your text has \"Q:\" and \"A:\".");
            }
            duplex_cards::save_json(&cards, &output).await?;
            println!("Converted {} card(s) → {}", cards.len(), output.display());
        }

        Commands::Config { output } => {
            PrintConfiguration::default().save(&output).await?;
            println!("Default configuration → {}", output.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overrides(args: &[&str]) -> PrintOverrides {
        let mut argv = vec!["dcards", "print", "--output", "out.pdf"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Print { overrides, .. } => overrides,
            _ => panic!("expected print command"),
        }
    }

    fn configured_back() -> PrintConfiguration {
        PrintConfiguration {
            side: Side::Back,
            page_order: PageOrder::Reverse,
            ..Default::default()
        }
    }

    #[test]
    fn test_configured_side_used_without_flag() {
        let mut config = configured_back();
        overrides(&[]).apply(&mut config);
        assert_eq!(config.side, Side::Back);
        assert_eq!(config.page_order, PageOrder::Reverse);
    }

    #[test]
    fn test_flags_override_configuration() {
        let mut config = configured_back();
        overrides(&[
            "--side",
            "front",
            "--page-order",
            "same",
            "--position-map",
            "swap-rows",
            "--rotate-back",
            "--no-guides",
            "--test-cards",
            "8",
        ])
        .apply(&mut config);

        assert_eq!(config.side, Side::Front);
        assert_eq!(config.page_order, PageOrder::Same);
        assert_eq!(config.position_map, PositionMap::SwapRows);
        assert_eq!(config.back_rotation, BackRotation::Rotate180);
        assert!(!config.show_cut_guides);
        assert_eq!(config.test_card_count, 8);
    }

    #[test]
    fn test_default_side_is_front() {
        let mut config = PrintConfiguration::default();
        overrides(&[]).apply(&mut config);
        assert_eq!(config.side, Side::Front);
    }
}
