//! Plain-text build reports rendered from the templates under `templates/`: the
//! categorized operations with the diagnostics maintainers need to act on, and the
//! friendly-name table.

use minijinja::{Environment, context};

use crate::error::ReportError;
use crate::index::FriendlyOperationNames;
use crate::model::{Diagnostic, Operation, OperationCategory};
use crate::pipeline::DocModel;

fn environment() -> Result<Environment<'static>, ReportError> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.add_template("report.txt.j2", include_str!("../templates/report.txt.j2"))?;
    env.add_template("op-names.txt.j2", include_str!("../templates/op-names.txt.j2"))?;
    Ok(env)
}

/// Render the categorized operations and diagnostics. Empty slots and categories are
/// omitted.
pub fn render_text(model: &DocModel) -> Result<String, ReportError> {
    let env = environment()?;
    let tmpl = env.get_template("report.txt.j2")?;

    let categories: Vec<_> = model
        .categories
        .iter()
        .filter(|c| c.operation_count() > 0)
        .map(|c| category_to_ctx(model, c))
        .collect();
    let unmatched: Vec<_> = model
        .unmatched()
        .into_iter()
        .map(|(id, name)| context! { id => id, name => name })
        .collect();
    let other: Vec<String> = model
        .diagnostics
        .iter()
        .filter(|d| {
            !matches!(
                d,
                Diagnostic::Unclassified { .. } | Diagnostic::UnmatchedFriendlyName { .. }
            )
        })
        .map(|d| d.to_string())
        .collect();
    let summary = model.summary();

    Ok(tmpl.render(context! {
        categories => categories,
        unclassified => model.unclassified(),
        unmatched => unmatched,
        other => other,
        definitions => summary.definitions,
        operations => summary.operations,
        classified => summary.classified,
    })?)
}

fn category_to_ctx(model: &DocModel, category: &OperationCategory) -> minijinja::Value {
    let slots: Vec<_> = category
        .friendly_names
        .iter()
        .filter(|s| !s.operations.is_empty())
        .map(|s| {
            let operations: Vec<_> = s
                .operations
                .iter()
                .filter_map(|&h| model.operations.get_index(h))
                .map(operation_to_ctx)
                .collect();
            context! {
                name => s.name.clone(),
                operations => operations,
            }
        })
        .collect();
    context! {
        name => category.name.clone(),
        slots => slots,
    }
}

fn operation_to_ctx(op: &Operation) -> minijinja::Value {
    let target = op
        .definition
        .as_ref()
        .map(|gvk| gvk.to_string())
        .unwrap_or_else(|| "-".to_string());
    context! {
        id => op.id.clone(),
        method => op.http_method.as_str(),
        path => op.path.clone(),
        target => target,
    }
}

/// `"id": "name"` lines for every operation the table names, then `"TODO"` lines for
/// the ones it does not, followed by the totals.
///
/// Names are taken from the table itself, so an entry whose name matches no slot is
/// kept as written.
pub fn render_op_names(
    model: &DocModel,
    friendly_names: &FriendlyOperationNames,
) -> Result<String, ReportError> {
    let env = environment()?;
    let tmpl = env.get_template("op-names.txt.j2")?;

    let mut named = Vec::new();
    let mut missing = Vec::new();
    for op in model
        .operations
        .sorted_handles()
        .into_iter()
        .filter_map(|h| model.operations.get_index(h))
    {
        match friendly_names.get(&op.id) {
            Some(name) => named.push(context! { id => op.id.clone(), name => name.clone() }),
            None => missing.push(op.id.clone()),
        }
    }

    Ok(tmpl.render(context! {
        named => named,
        missing => missing,
        total => model.operations.len(),
    })?)
}
