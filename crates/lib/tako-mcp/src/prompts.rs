//! Prompt templates.
//!
//! Each template takes the user's text verbatim and wraps it in instructions
//! that steer an agent toward the Tako tools.

use rmcp::{
    handler::server::wrapper::Parameters,
    model::{PromptMessage, PromptMessageRole},
    prompt,
    prompt_router,
    schemars,
};
use serde::{Deserialize, Serialize};
use tako_core::dataset::TakoDataFormatDataset;

use crate::TakoMcp;

/// Arguments shared by both prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PromptTextArgs {
    /// The user's question or dataset, inserted verbatim.
    pub text: String,
}

/// Builds the search-planning prompt for `text`.
#[must_use]
pub fn search_tako_prompt(text: &str) -> String {
    format!(
        r#"
You are a data analyst agent that generates Tako search queries for a user input text, to search Tako and retrieve real-time data and visualizations.

Generate queries and search Tako following the instructions below:

Step 1. Generate search queries and call `search` once for each query.
* If the text includes a cohort such as "G7", "African Countries" or "Magnificent 7 stocks", generate a query for each individual country, stock, or company in the cohort. For example, for "G7" generate queries for "United States", "Canada", "France", "Germany", "Italy", "Japan", and "United Kingdom".
* If the text is about a broad topic, generate specific queries related to the topic.
* If the text can be answered by ranking the data, use semantic functions such as "Top 10" or "Bottom 10".
* If the text is about a timeline, start the query with "Timeline of".
* Search for a single metric per query. For a company, ask "Market Cap of Tesla" or "Revenue of Tesla", not "Tesla's Market Cap and Revenue".

Step 2. Ground your answer in the results from Tako.
* Use the data Tako returns to support every claim in your answer.

Step 3. Add the visualizations from Step 1 to your answer.
* Use the embed or image links returned by Tako.

<UserInputText>
{text}
</UserInputText>
"#
    )
}

/// Builds the dataset tidying and enrichment prompt for `text`.
#[must_use]
pub fn visualization_prompt(text: &str) -> String {
    let schema = TakoDataFormatDataset::json_schema();
    format!(
        r#"You are an expert at tidying up datasets and adding rich metadata to them to help with visualization.

*** Task 1: Tidy the dataset ***

Take the dataset and make it a "tidy dataset".

Three interrelated rules make a dataset tidy:

1. Each variable is a column; each column is a variable.
2. Each observation is a row; each row is an observation.
3. Each value is a cell; each cell is a single value.

Two common problems make ingested data untidy:

1. A variable is spread across multiple columns.
2. An observation is scattered across multiple rows.

For 1., "melt" the wide data with multiple columns into long data.
For 2., unstack or pivot the multiple rows into columns (long to wide).

Example 1 (needs melting):
| country | 1999 | 2000 |
| USA     | 100  | 200  |
| Canada  | 10   | 20   |

Becomes (after melting):
| country | year | value |
| USA     | 1999 | 100   |
| USA     | 2000 | 200   |
| Canada  | 1999 | 10    |
| Canada  | 2000 | 20    |

Example 2 (needs pivoting):
| country | year | type       | count
| USA     | 2020 | cases      | 10
| USA     | 2020 | population | 2000000
| USA     | 2021 | cases      | 30
| USA     | 2021 | population | 2050000
| Canada  | 2020 | cases      | 40
| Canada  | 2020 | population | 3000000
| Canada  | 2021 | population | 3000000

Becomes (after pivoting):
| country | year | cases | population
| USA     | 2020 | 10    | 2000000
| USA     | 2021 | 30    | 2050000
| Canada  | 2020 | 40    | 3000000
| Canada  | 2021 | NULL  | 3000000

*** Task 2: Enrich the dataset with metadata ***

Add rich metadata to the dataset to help with visualization.
For variables suited to timeseries visualizations, add `timeseries_metadata`.
For variables suited to categorical bar chart visualizations, add `categorical_metadata`.
Cells of `date` and `datetime` variables are JSON strings, so the year 2020 is written "2020".

The dataset must follow this JSON Schema:
{schema}

Make the metadata consistent, rich, and useful for visualizations, then call
`visualize_dataset` with the result.

<UserInputText>
{text}
</UserInputText>
"#
    )
}

#[prompt_router(router = "prompt_router_templates", vis = "pub")]
impl TakoMcp {
    #[prompt(
        name = "generate_search_tako_prompt",
        description = "Generate a prompt to search Tako for given user input text."
    )]
    async fn generate_search_tako_prompt(
        &self,
        Parameters(args): Parameters<PromptTextArgs>,
    ) -> Vec<PromptMessage> {
        vec![PromptMessage::new_text(
            PromptMessageRole::User,
            search_tako_prompt(&args.text),
        )]
    }

    #[prompt(
        name = "generate_visualization_prompt",
        description = "Generate a prompt to generate a visualization for given user input text."
    )]
    async fn generate_visualization_prompt(
        &self,
        Parameters(args): Parameters<PromptTextArgs>,
    ) -> Vec<PromptMessage> {
        vec![PromptMessage::new_text(
            PromptMessageRole::User,
            visualization_prompt(&args.text),
        )]
    }
}
