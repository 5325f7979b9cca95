//! Aliases command implementation.

use crate::cli::AliasesArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use medrag_domain::{AliasDictionary, TermKind};
use medrag_safety::extract_mentions;

/// Execute the aliases command.
pub fn execute_aliases(args: AliasesArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let dictionary = config.aliases()?;
    println!("{}", render_aliases(&args, &dictionary, formatter)?);
    Ok(())
}

/// List alias tables, or the terms a text mentions when `--text` is given.
pub fn render_aliases(
    args: &AliasesArgs,
    dictionary: &AliasDictionary,
    formatter: &Formatter,
) -> Result<String> {
    let kind = args.kind.map(TermKind::from);

    if let Some(text) = &args.text {
        let drugs = match kind {
            Some(TermKind::Condition) => Default::default(),
            _ => extract_mentions(text, dictionary.drugs()),
        };
        let conditions = match kind {
            Some(TermKind::Drug) => Default::default(),
            _ => extract_mentions(text, dictionary.conditions()),
        };
        return formatter.format_mentions(text, &drugs, &conditions);
    }

    let kinds = match kind {
        Some(kind) => vec![kind],
        None => vec![TermKind::Drug, TermKind::Condition],
    };
    let sections = kinds
        .into_iter()
        .map(|kind| formatter.format_aliases(kind, dictionary.table(kind)))
        .collect::<Result<Vec<_>>>()?;
    Ok(sections.join("\n"))
}
