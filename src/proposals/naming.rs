use super::{compact_json, Proposals};
use crate::fallback::naming_fallback;
use crate::prompts;
use crate::provider::output_parse::string_list;
use crate::provider::TextGenerator;
use crate::shared::text::{latin_dominates, normalize_list};
use crate::store::{ProblemSpec, ProcessContext, ProcessProposals};

const PROCESS_LIMIT: usize = 5;
const PROJECT_LIMIT: usize = 3;

impl<G: TextGenerator> Proposals<G> {
    /// Process and project name variants. Falls back to names built from the
    /// context boundaries when generation fails or returns nothing usable.
    pub fn step3_naming(
        &self,
        raw_problem: &str,
        problem_spec: &ProblemSpec,
        ctx: &ProcessContext,
    ) -> ProcessProposals {
        let messages =
            prompts::step3_naming(raw_problem, &compact_json(problem_spec), &compact_json(ctx))
                .messages();
        let reason = match self.runner().call_json(&messages) {
            Ok(data) => {
                let proposals = ProcessProposals {
                    process_variants: normalize_list(
                        string_list(data.get("process_variants")),
                        PROCESS_LIMIT,
                    ),
                    project_variants: normalize_list(
                        string_list(data.get("project_variants")),
                        PROJECT_LIMIT,
                    ),
                };
                let text = [
                    proposals.process_variants.join(" "),
                    proposals.project_variants.join(" "),
                ]
                .join(" ");
                if proposals.is_empty() {
                    "empty".to_string()
                } else if latin_dominates(&text) {
                    "language_guard".to_string()
                } else {
                    return proposals;
                }
            }
            Err(err) => err.to_string(),
        };
        self.log_fallback("step3_naming", &reason);
        naming_fallback(raw_problem, ctx)
    }
}
