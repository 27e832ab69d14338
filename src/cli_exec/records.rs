use studio::forms;
use studio::model::EntitySpec;

use super::*;

fn loaded_screen(ctx: &CliContext, kind: EntityKind) -> Result<CollectionScreen> {
    let store = ctx.store_for(kind)?;
    let mut screen = CollectionScreen::new(kind);
    screen.refresh(Some(store.as_ref()))?;
    Ok(screen)
}

fn summary_line(spec: &EntitySpec, rec: &Record) -> String {
    let mut parts = vec![
        rec.id.clone(),
        rec.created_at.chars().take(10).collect::<String>(),
    ];
    for f in spec.status_fields() {
        parts.push(f.resolve(rec).to_string());
    }
    parts.push(rec.text(spec.headline_field).unwrap_or_default());
    parts.join("  ")
}

pub(super) fn handle_list_command(
    ctx: &CliContext,
    kind: EntityKind,
    query: Option<&str>,
    facet: Option<&str>,
    json: bool,
) -> Result<()> {
    let spec = kind.spec();
    let facet = facet.map(Facet::parse).unwrap_or_default();
    if let Facet::Only(value) = &facet {
        let Some(field) = &spec.facet else {
            anyhow::bail!("{} has no facet", kind);
        };
        if !field.is_valid(value) {
            return Err(ConsoleError::InvalidStatus {
                field: field.field.to_string(),
                value: value.clone(),
                expected: field.values().join(", "),
            }
            .into());
        }
    }

    let mut screen = loaded_screen(ctx, kind)?;
    screen.set_query(query.unwrap_or_default());
    screen.set_facet(facet);
    let visible = screen.visible();

    if json {
        return print_json(&visible, "records");
    }
    if visible.is_empty() {
        println!("(no records)");
        return Ok(());
    }
    for rec in visible {
        println!("{}", summary_line(spec, rec));
    }
    Ok(())
}

pub(super) fn handle_stats_command(
    ctx: &CliContext,
    kind: EntityKind,
    field: Option<&str>,
    json: bool,
) -> Result<()> {
    let screen = loaded_screen(ctx, kind)?;
    let Some(counts) = screen.stats(field) else {
        anyhow::bail!(
            "{} has no status field{}",
            kind,
            field.map(|f| format!(" named {}", f)).unwrap_or_default()
        );
    };

    if json {
        let by_status: serde_json::Map<String, serde_json::Value> = counts
            .by_status
            .iter()
            .map(|(s, n)| (s.to_string(), serde_json::Value::from(*n)))
            .collect();
        return print_json(
            &serde_json::json!({
                "field": counts.field,
                "total": counts.total,
                "by_status": by_status,
            }),
            "stats",
        );
    }
    println!("{} total {}", counts.field, counts.total);
    for (status, n) in &counts.by_status {
        println!("  {:<12} {}", status, n);
    }
    Ok(())
}

pub(super) fn handle_set_status_command(
    ctx: &CliContext,
    kind: EntityKind,
    ids: Vec<String>,
    to: &str,
    field: Option<&str>,
) -> Result<()> {
    let spec = kind.spec();
    let status_field = match field {
        Some(name) => spec.workflow(name),
        None => spec.primary_workflow(),
    }
    .with_context(|| format!("{} has no such status workflow", kind))?;

    let store = ctx.store_for(kind)?;
    let targets = Targets::many(ids)?;
    let affected =
        MutationGateway::new(store.as_ref(), spec).update_status(status_field, &targets, to)?;
    println!(
        "Updated {} of {} {} to {}",
        affected.len(),
        targets.len(),
        status_field.field,
        to
    );
    Ok(())
}

/// The phrase typed on the command line goes through the same gate as the console dialog.
pub(super) fn handle_delete_command(
    ctx: &CliContext,
    kind: EntityKind,
    ids: Vec<String>,
    confirm: &str,
) -> Result<()> {
    let spec = kind.spec();
    if spec.read_only {
        return Err(ConsoleError::ReadOnly(spec.title.to_string()).into());
    }
    let targets = Targets::many(ids)?;
    let phrase = if targets.len() == 1 {
        spec.single_delete_phrase
    } else {
        spec.bulk_delete_phrase
    };

    let mut gate = ConfirmationGate::new();
    gate.open(phrase, targets.ids().to_vec());
    gate.set_input(confirm);
    if !gate.can_confirm() {
        anyhow::bail!(
            "confirmation phrase mismatch (pass --confirm {:?} to delete {} record(s))",
            phrase,
            targets.len()
        );
    }

    let store = ctx.store_for(kind)?;
    let result = gate.confirm(|ids| {
        let targets = Targets::many(ids.iter().cloned())?;
        MutationGateway::new(store.as_ref(), spec).remove(&targets)
    });
    let affected = result.context("confirmation gate closed")??;
    println!("Deleted {} of {}", affected.len(), targets.len());
    Ok(())
}

/// `submit` goes out without a credential; `create` uses the stored one.
pub(super) fn handle_submit_command(
    ctx: &CliContext,
    kind: EntityKind,
    raw: &[String],
    authenticated: bool,
    json: bool,
) -> Result<()> {
    let pairs = forms::parse_pairs(raw)?;
    let row = if authenticated {
        let client = ctx.authenticated()?;
        forms::submit(client.as_ref(), kind, pairs)?
    } else {
        let client = ctx.anonymous()?;
        forms::submit(&client, kind, pairs)?
    };
    if json {
        return print_json(&row, "record");
    }
    println!("{}", row.id);
    Ok(())
}

pub(super) fn handle_edit_command(
    ctx: &CliContext,
    kind: EntityKind,
    id: String,
    raw: &[String],
) -> Result<()> {
    let fields = forms::build_edit(kind, forms::parse_pairs(raw)?)?;
    let store = ctx.store_for(kind)?;
    let affected = MutationGateway::new(store.as_ref(), kind.spec())
        .update_fields(&Targets::one(id.clone()), &fields)?;
    if affected.is_empty() {
        anyhow::bail!("{} {}: not found or not editable by you", kind, id);
    }
    println!("Updated {}", id);
    Ok(())
}
