//! Tree command implementations: show, find, root, add, update, remove

use std::io::IsTerminal;

use colored::Colorize;
use dialoguer::{Confirm, theme::ColorfulTheme};

use crate::cli::{CommandContext, GlobalOptions, NodeArgs, OutputFormat};
use crate::error::{Error, Result, TreeError};
use crate::models::{NodeDetail, NodeDisplay, display::pruned};
use crate::output::{format_json, format_table, render_tree};
use crate::tree::{NewNode, NodePatch, OrgNode, ops};

/// Run the show command
pub async fn show(opts: &GlobalOptions, root: Option<&str>, depth: Option<usize>) -> Result<()> {
    let mut ctx = CommandContext::new(opts)?;
    let format = ctx.format;
    let tree = ctx.require_tree().await?;

    let start = match root {
        Some(id) => tree
            .find(id)
            .ok_or_else(|| TreeError::NodeNotFound(id.to_string()))?,
        None => tree.root(),
    };

    match format {
        OutputFormat::Pretty => print!("{}", render_tree(start, depth)),
        OutputFormat::Table => println!("{}", format_table(&NodeDisplay::rows(start, depth))),
        OutputFormat::Json => println!("{}", format_json(&pruned(start, depth))?),
    }

    Ok(())
}

/// Run the find command
pub async fn find(opts: &GlobalOptions, id: &str) -> Result<()> {
    let mut ctx = CommandContext::new(opts)?;
    let format = ctx.format;
    let domain = ctx.config.contact_domain.clone();
    let tree = ctx.require_tree().await?;

    let node = tree
        .find(id)
        .ok_or_else(|| TreeError::NodeNotFound(id.to_string()))?;
    let path = ops::path_to(tree.root(), id).unwrap_or_default();
    let detail = NodeDetail::new(node, path, &domain);

    match format {
        OutputFormat::Pretty => print_detail(&detail),
        OutputFormat::Table => println!("{}", format_table(&NodeDisplay::rows(node, Some(0)))),
        OutputFormat::Json => println!("{}", format_json(&detail)?),
    }

    Ok(())
}

fn print_detail(detail: &NodeDetail) {
    println!("{} {}", detail.name.bold(), format!("({})", detail.id).dimmed());
    println!("  Title:           {}", detail.title.cyan());
    println!(
        "  Reports to:      {}",
        detail.parent_id.as_deref().unwrap_or("-")
    );
    if detail.direct_reports.is_empty() {
        println!("  Direct reports:  -");
    } else {
        println!("  Direct reports:  {}", detail.direct_reports.join(", "));
    }
    if let Some(count) = detail.count {
        println!("  Headcount:       {}", count);
    }
    if let Some(ref image) = detail.image {
        println!("  Image:           {}", image);
    }
    println!("  Contact:         {}", detail.contact);
    println!("  Location:        {}", detail.location);
    println!("  Path:            {}", detail.path.join(" › ").dimmed());
}

/// Run the root command
pub async fn create_root(opts: &GlobalOptions, args: NodeArgs) -> Result<()> {
    let mut ctx = CommandContext::new(opts)?;
    ctx.chart.load().await?;

    let created = ctx.chart.create_root(new_node(None, args)).await?;
    print_created(ctx.format, &created)
}

/// Run the add command
pub async fn add(
    opts: &GlobalOptions,
    parent_id: &str,
    args: NodeArgs,
    dry_run: bool,
) -> Result<()> {
    let mut ctx = CommandContext::new(opts)?;
    let tree = ctx.require_tree().await?;
    let parent = tree
        .find(parent_id)
        .ok_or_else(|| TreeError::NodeNotFound(parent_id.to_string()))?;

    if dry_run {
        println!(
            "Would add {} ({}) as report #{} of {} ({})",
            args.name.bold(),
            args.title,
            parent.children.len() + 1,
            parent.name.bold(),
            parent.id
        );
        return Ok(());
    }

    let created = ctx
        .chart
        .add_child(new_node(Some(parent_id.to_string()), args))
        .await?;
    print_created(ctx.format, &created)
}

fn new_node(parent_id: Option<String>, args: NodeArgs) -> NewNode {
    NewNode {
        parent_id,
        name: args.name,
        title: args.title,
        image: args.image,
        count: args.count,
        position: None,
    }
}

fn print_created(format: OutputFormat, created: &OrgNode) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", format_json(created)?),
        _ => match created.parent_id {
            Some(ref parent) => println!(
                "{} Added {} ({}) under {}",
                "✓".green(),
                created.name.bold(),
                created.id,
                parent
            ),
            None => println!(
                "{} Created root {} ({})",
                "✓".green(),
                created.name.bold(),
                created.id
            ),
        },
    }
    Ok(())
}

/// Run the update command
pub async fn update(opts: &GlobalOptions, id: &str, patch: NodePatch, dry_run: bool) -> Result<()> {
    if patch.is_empty() {
        return Err(Error::Other(
            "Nothing to update; pass at least one of --name, --title, --image, --count"
                .to_string(),
        ));
    }

    let mut ctx = CommandContext::new(opts)?;
    let format = ctx.format;
    let tree = ctx.require_tree().await?;
    let before = tree
        .find(id)
        .ok_or_else(|| TreeError::NodeNotFound(id.to_string()))?
        .clone();

    if dry_run {
        let mut after = before.clone();
        patch.apply_to(&mut after);
        println!("Would update {} ({}):", before.name.bold(), before.id);
        print_changes(&before, &after);
        return Ok(());
    }

    let after = ctx.chart.update(id, &patch).await?;
    match format {
        OutputFormat::Json => println!("{}", format_json(&after.with_replaced_children(Vec::new()))?),
        _ => {
            println!("{} Updated {} ({})", "✓".green(), after.name.bold(), after.id);
            print_changes(&before, after);
        }
    }
    Ok(())
}

fn print_changes(before: &OrgNode, after: &OrgNode) {
    let fields = [
        ("name", Some(before.name.clone()), Some(after.name.clone())),
        ("title", Some(before.title.clone()), Some(after.title.clone())),
        ("image", before.image.clone(), after.image.clone()),
        (
            "count",
            before.count.map(|c| c.to_string()),
            after.count.map(|c| c.to_string()),
        ),
    ];
    for (field, old, new) in fields {
        if old != new {
            println!(
                "  {}: {} → {}",
                field,
                old.as_deref().unwrap_or("-").red(),
                new.as_deref().unwrap_or("-").green()
            );
        }
    }
}

/// Run the remove command
pub async fn remove(opts: &GlobalOptions, id: &str, yes: bool, dry_run: bool) -> Result<()> {
    let mut ctx = CommandContext::new(opts)?;
    let format = ctx.format;
    let tree = ctx.require_tree().await?;
    if tree.root().id == id {
        return Err(TreeError::RootRemoval(id.to_string()).into());
    }
    let node = tree
        .find(id)
        .ok_or_else(|| TreeError::NodeNotFound(id.to_string()))?;
    let reports = ops::descendant_ids(node).len();
    let name = node.name.clone();

    if dry_run {
        println!(
            "Would remove {} ({}) and {} report(s)",
            name.bold(),
            id,
            reports
        );
        for descendant in ops::descendant_ids(node) {
            println!("  - {}", descendant);
        }
        return Ok(());
    }

    if !yes && !confirm_removal(&name, id, reports)? {
        println!("Cancelled.");
        return Ok(());
    }

    let removed = ctx.chart.remove(id).await?;
    match format {
        OutputFormat::Json => {
            println!("{}", format_json(&serde_json::json!({ "removed": removed }))?)
        }
        _ => println!(
            "{} Removed {} ({} node(s))",
            "✓".green(),
            name.bold(),
            removed.len()
        ),
    }
    Ok(())
}

fn confirm_removal(name: &str, id: &str, reports: usize) -> Result<bool> {
    if !std::io::stdin().is_terminal() {
        return Err(Error::Other(
            "Refusing to remove without confirmation; pass --yes".to_string(),
        ));
    }

    let prompt = if reports == 0 {
        format!("Remove {} ({})?", name, id)
    } else {
        format!("Remove {} ({}) and {} report(s)?", name, id, reports)
    };
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}
