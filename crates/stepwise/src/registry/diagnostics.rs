//! JSON export of the registry for external tooling.

use serde::Serialize;

use super::{RegisteredStep, StepRegistry};

#[derive(Serialize)]
struct DumpedStep<'a> {
    id: &'a str,
    scope: &'a str,
    keyword: &'static str,
    parser: &'a str,
    target_fixture: Option<&'a str>,
    converters: Vec<&'a str>,
    fixtures: &'a [String],
    file: &'static str,
    line: u32,
    column: u32,
}

impl<'a> From<&'a RegisteredStep> for DumpedStep<'a> {
    fn from(step: &'a RegisteredStep) -> Self {
        let definition = step.context();
        let location = definition.location();
        Self {
            id: step.id(),
            scope: step.scope(),
            keyword: definition.keyword().as_str(),
            parser: definition.parser().name(),
            target_fixture: definition.target_fixture(),
            converters: definition.converters().keys().map(String::as_str).collect(),
            fixtures: definition.fixtures(),
            file: location.file,
            line: location.line,
            column: location.column,
        }
    }
}

#[derive(Serialize)]
struct DumpedDuplicate<'a> {
    scope: &'a str,
    ids: Vec<&'a str>,
}

#[derive(Serialize)]
struct RegistryDump<'a> {
    steps: Vec<DumpedStep<'a>>,
    duplicates: Vec<DumpedDuplicate<'a>>,
}

pub(super) fn dump(registry: &StepRegistry) -> serde_json::Result<String> {
    let steps = registry.iter().map(DumpedStep::from).collect();
    let duplicates = registry
        .duplicates()
        .into_iter()
        .filter_map(|group| {
            let scope = group.first()?.scope();
            Some(DumpedDuplicate {
                scope,
                ids: group.iter().map(|step| step.id()).collect(),
            })
        })
        .collect();
    serde_json::to_string(&RegistryDump { steps, duplicates })
}
