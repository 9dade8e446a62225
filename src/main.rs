use std::io::{self, BufRead};

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use tracing::Level;

use inputmask::{
    AffinityCalculationStrategy, CaretString, MaskCache, MaskPicker, MaskResult, Notation,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Primary mask format, e.g. "+7 ([000]) [000]-[00]-[00]"
    #[arg(value_name = "FORMAT")]
    format: String,

    /// Text to format; lines are read from stdin when omitted
    #[arg(value_name = "TEXT")]
    text: Vec<String>,

    /// Affine mask format (repeatable)
    #[arg(short, long, value_name = "FORMAT")]
    affine: Vec<String>,

    /// Custom notation `c:set`, or `c?:set` for an optional symbol (repeatable)
    #[arg(short, long, value_name = "NOTATION", value_parser = parse_notation)]
    notation: Vec<Notation>,

    /// How affine masks are ranked
    #[arg(short, long, value_enum, default_value_t = StrategyArg::WholeString)]
    strategy: StrategyArg,

    /// Caret position in TEXT (default: end of text)
    #[arg(long, value_name = "N")]
    caret: Option<usize>,

    /// Do not append trailing decoration
    #[arg(long)]
    no_autocomplete: bool,

    /// Fill masks from the right
    #[arg(long)]
    rtl: bool,

    /// Print the placeholder and length bounds of the primary mask
    #[arg(long)]
    describe: bool,

    /// Raise log verbosity (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StrategyArg {
    WholeString,
    Prefix,
    Capacity,
}

impl From<StrategyArg> for AffinityCalculationStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::WholeString => Self::WholeString,
            StrategyArg::Prefix => Self::Prefix,
            StrategyArg::Capacity => Self::Capacity,
        }
    }
}

/// Parse `c:set` or `c?:set`.
fn parse_notation(arg: &str) -> Result<Notation> {
    let Some((head, character_set)) = arg.split_once(':') else {
        bail!("notation {arg:?} is missing ':' between symbol and character set");
    };
    let (symbol, is_optional) = match head.strip_suffix('?') {
        Some(symbol) => (symbol, true),
        None => (head, false),
    };
    let mut chars = symbol.chars();
    let (Some(character), None) = (chars.next(), chars.next()) else {
        bail!("notation symbol {symbol:?} must be a single character");
    };
    if character_set.is_empty() {
        bail!("notation {character:?} has an empty character set");
    }
    Ok(Notation::new(character, character_set, is_optional))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn print_result(result: &MaskResult) {
    println!("formatted: {}", result.formatted_text.string);
    println!("value:     {}", result.extracted_value);
    println!("caret:     {}", result.formatted_text.caret_position);
    println!("complete:  {}", result.complete);
    println!("affinity:  {}", result.affinity);
}

fn run(args: Args) -> Result<()> {
    let picker = MaskPicker::new(args.format.as_str())
        .with_affine_formats(args.affine)
        .with_custom_notations(args.notation)
        .with_affinity_strategy(args.strategy.into())
        .with_autocomplete(!args.no_autocomplete)
        .with_right_to_left(args.rtl);
    let cache = MaskCache::global();

    let primary = picker
        .primary_mask(cache)
        .with_context(|| format!("invalid mask format {:?}", picker.primary_format))?;
    if args.describe {
        println!("placeholder:       {}", primary.placeholder());
        println!("acceptable text:   {}", primary.acceptable_text_length());
        println!("total text:        {}", primary.total_text_length());
        println!("acceptable value:  {}", primary.acceptable_value_length());
        println!("total value:       {}", primary.total_value_length());
    }

    let inputs = if args.text.is_empty() {
        io::stdin()
            .lock()
            .lines()
            .collect::<io::Result<Vec<_>>>()
            .context("failed to read stdin")?
    } else {
        args.text
    };

    for (index, input) in inputs.iter().enumerate() {
        let text = match args.caret {
            Some(caret) => CaretString::new(input.as_str(), caret),
            None => CaretString::at_end(input.as_str()),
        };
        let result = picker
            .apply(cache, &text)
            .context("invalid affine mask format")?;
        if index > 0 {
            println!();
        }
        print_result(&result);
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(err) = run(args) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mandatory_notation() {
        let notation = parse_notation("b:abc").expect("valid notation");
        assert_eq!(notation, Notation::new('b', "abc", false));
    }

    #[test]
    fn test_parse_optional_notation() {
        let notation = parse_notation("x?:xyz").expect("valid notation");
        assert_eq!(notation, Notation::new('x', "xyz", true));
    }

    #[test]
    fn test_parse_notation_keeps_colons_in_set() {
        let notation = parse_notation("c::;").expect("valid notation");
        assert_eq!(notation.character_set, ":;");
    }

    #[test]
    fn test_parse_notation_errors() {
        assert!(parse_notation("abc").is_err());
        assert!(parse_notation("bb:abc").is_err());
        assert!(parse_notation(":abc").is_err());
        assert!(parse_notation("b:").is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "inputmask",
            "[00]",
            "12",
            "-a",
            "[000]",
            "-n",
            "b?:abc",
            "-s",
            "capacity",
            "--rtl",
            "-vv",
        ])
        .expect("valid arguments");
        assert_eq!(args.text, vec!["12"]);
        assert_eq!(args.affine, vec!["[000]"]);
        assert_eq!(args.notation, vec![Notation::new('b', "abc", true)]);
        assert!(matches!(args.strategy, StrategyArg::Capacity));
        assert!(args.rtl);
        assert_eq!(args.verbose, 2);
    }
}
