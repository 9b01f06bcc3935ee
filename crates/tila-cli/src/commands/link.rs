use clap::Args;
use serde_json::{json, Value};

use tila_core::link;

use super::loan::TermsArgs;

/// Arguments for the share-link codec.
///
/// Without `--decode`, encodes the resolved terms as a query string.
/// With `--decode`, parses a query string back into loan terms JSON.
#[derive(Args)]
pub struct LinkArgs {
    /// Query string to decode back into loan terms
    #[arg(long)]
    pub decode: Option<String>,

    #[command(flatten)]
    pub terms: TermsArgs,
}

pub fn run_link(args: LinkArgs) -> Result<Value, Box<dyn std::error::Error>> {
    if let Some(ref query) = args.decode {
        let terms = link::parse_share_query(query)?;
        return Ok(serde_json::to_value(terms)?);
    }

    let terms = args.terms.resolve()?;
    let query = link::to_share_query(&terms);
    Ok(json!({ "query": query }))
}
