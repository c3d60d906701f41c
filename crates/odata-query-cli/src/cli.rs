//! Command-line interface for inspecting query options.

use std::io::Write;

use clap::{Args, Parser, Subcommand};
use eyre::Result;
use odata_query::{
    FilterQuery, Grammar, ParseNode, QueryError, SearchQuery, Token, TokenKind,
    parse_count_string, parse_filter_string, parse_inline_count_string, parse_orderby_string,
    parse_search_string, parse_select_string, parse_skip_string, parse_top_string,
    shared_filter_grammar, shared_search_grammar,
};

use crate::config::{CliConfig, LogLevel, OutputFormat};
use crate::error::CliError;
use crate::output::{write_json, write_line, write_postfix, write_tokens, write_tree};

/// Inspect how OData query options are tokenized and parsed.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Log level for engine diagnostics (overrides `ODATA_QUERY_LOG_LEVEL`).
    #[arg(long, global = true)]
    pub log_level: Option<LogLevel>,
    /// Output format: tree, postfix, tokens or json (overrides
    /// `ODATA_QUERY_OUTPUT`).
    #[arg(long, short, global = true)]
    pub output: Option<OutputFormat>,
    /// The query option to parse.
    #[command(subcommand)]
    pub command: Command,
}

/// One subcommand per supported query option.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse a `$filter` expression.
    Filter(OptionValue),
    /// Parse a `$search` expression.
    Search(OptionValue),
    /// Parse an `$orderby` list.
    Orderby(OptionValue),
    /// Parse a `$select` list.
    Select(OptionValue),
    /// Parse a `$top` count.
    Top(OptionValue),
    /// Parse a `$skip` count.
    Skip(OptionValue),
    /// Parse a `$count` flag.
    Count(OptionValue),
    /// Parse an `$inlinecount` mode.
    Inlinecount(OptionValue),
}

impl Command {
    /// The query option name, including its `$` prefix.
    #[must_use]
    pub const fn option_name(&self) -> &'static str {
        match self {
            Self::Filter(_) => "$filter",
            Self::Search(_) => "$search",
            Self::Orderby(_) => "$orderby",
            Self::Select(_) => "$select",
            Self::Top(_) => "$top",
            Self::Skip(_) => "$skip",
            Self::Count(_) => "$count",
            Self::Inlinecount(_) => "$inlinecount",
        }
    }

    const fn value(&self) -> &OptionValue {
        match self {
            Self::Filter(value)
            | Self::Search(value)
            | Self::Orderby(value)
            | Self::Select(value)
            | Self::Top(value)
            | Self::Skip(value)
            | Self::Count(value)
            | Self::Inlinecount(value) => value,
        }
    }
}

/// The raw option value.
#[derive(Debug, Args)]
pub struct OptionValue {
    /// Option text, already percent-decoded.
    pub text: String,
}

impl Cli {
    /// Resolve configuration from the environment and command-line flags.
    ///
    /// # Errors
    ///
    /// Returns `CliError::InvalidConfig` if an environment variable holds an
    /// invalid value.
    pub fn config(&self) -> Result<CliConfig, CliError> {
        Ok(CliConfig::from_env()?.apply_overrides(self.log_level, self.output))
    }
}

/// The two expression grammars.
#[derive(Debug, Clone, Copy)]
enum Expression {
    Filter,
    Search,
}

impl Expression {
    fn grammar(self) -> Result<&'static Grammar, QueryError> {
        match self {
            Self::Filter => shared_filter_grammar(),
            Self::Search => shared_search_grammar(),
        }
    }

    fn tree(self, text: &str) -> Result<ParseNode, QueryError> {
        match self {
            Self::Filter => parse_filter_string(text).map(FilterQuery::into_tree),
            Self::Search => parse_search_string(text).map(SearchQuery::into_tree),
        }
    }
}

/// Parse the selected option and render it to `writer`.
///
/// # Errors
///
/// Returns the [`QueryError`] when the option is rejected, or an output
/// error when writing fails.
pub fn run(cli: &Cli, config: &CliConfig, writer: &mut dyn Write) -> Result<()> {
    let option = cli.command.option_name();
    let text = cli.command.value().text.as_str();
    let span = tracing::info_span!("inspect", option, format = ?config.output);
    let _entered = span.enter();
    tracing::debug!(text, "parsing option");

    match &cli.command {
        Command::Filter(_) => inspect_expression(Expression::Filter, text, config.output, writer),
        Command::Search(_) => inspect_expression(Expression::Search, text, config.output, writer),
        Command::Orderby(_) => inspect_orderby(text, config.output, writer),
        Command::Select(_) => {
            let query = parse_select_string(text)?;
            if config.output == OutputFormat::Json {
                return write_json(writer, &query);
            }
            query
                .items()
                .iter()
                .try_for_each(|item| write_line(writer, item))
        }
        Command::Top(_) => inspect_scalar(&parse_top_string(text)?, config.output, writer),
        Command::Skip(_) => inspect_scalar(&parse_skip_string(text)?, config.output, writer),
        Command::Count(_) => inspect_scalar(&parse_count_string(text)?, config.output, writer),
        Command::Inlinecount(_) => {
            inspect_scalar(&parse_inline_count_string(text)?, config.output, writer)
        }
    }
}

fn inspect_expression(
    expression: Expression,
    text: &str,
    format: OutputFormat,
    writer: &mut dyn Write,
) -> Result<()> {
    match format {
        OutputFormat::Tree => write_tree(writer, &expression.tree(text)?),
        OutputFormat::Json => write_json(writer, &expression.tree(text)?),
        OutputFormat::Tokens => {
            let grammar = expression.grammar()?;
            let tokens = grammar.tokenize(text).map_err(QueryError::from)?;
            write_tokens(writer, &tokens)
        }
        OutputFormat::Postfix => {
            let grammar = expression.grammar()?;
            let postfix = grammar.postfix(text).map_err(QueryError::from)?;
            write_postfix(writer, &postfix)
        }
    }
}

fn inspect_orderby(text: &str, format: OutputFormat, writer: &mut dyn Write) -> Result<()> {
    match format {
        OutputFormat::Tokens => {
            let grammar = shared_filter_grammar()?;
            let tokens = grammar.tokenize(text).map_err(QueryError::from)?;
            write_tokens(writer, &tokens)
        }
        OutputFormat::Json => write_json(writer, &parse_orderby_string(text)?),
        OutputFormat::Postfix => parse_orderby_string(text)?
            .items()
            .iter()
            .try_for_each(|item| {
                let mut postfix = item.expression.postfix();
                postfix.push(Token::new(item.direction.to_string(), TokenKind::Literal));
                write_postfix(writer, &postfix)
            }),
        OutputFormat::Tree => parse_orderby_string(text)?
            .items()
            .iter()
            .try_for_each(|item| {
                write_line(writer, format_args!("{}:", item.direction))?;
                write_tree(writer, &item.expression)
            }),
    }
}

fn inspect_scalar<T>(value: &T, format: OutputFormat, writer: &mut dyn Write) -> Result<()>
where
    T: std::fmt::Display + serde::Serialize,
{
    if format == OutputFormat::Json {
        write_json(writer, value)
    } else {
        write_line(writer, value)
    }
}
