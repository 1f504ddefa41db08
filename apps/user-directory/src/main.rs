use anyhow::{bail, Context, Result};
use rolecall_app_shell::AppShell;
use rolecall_core::{location_key, NodeId};
use rolecall_ui::{SemanticsNode, SemanticsRole};
use user_directory::App;

const USAGE: &str = "usage: user-directory [NAME EMAIL]...";

fn main() -> Result<()> {
    #[cfg(feature = "logging")]
    let _ = env_logger::try_init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|arg| arg == "-h" || arg == "--help") {
        println!("{USAGE}");
        return Ok(());
    }
    if args.len() % 2 != 0 {
        bail!("every name needs an email\n{USAGE}");
    }

    let mut shell = AppShell::new(location_key(file!(), line!(), column!()), || App());
    shell.settle()?;
    for pair in args.chunks(2) {
        let (name, email) = (&pair[0], &pair[1]);
        add_user(&mut shell, name, email)
            .with_context(|| format!("failed to add {name} <{email}>"))?;
    }

    print!("{}", shell.semantics_tree()?.dump());
    Ok(())
}

fn text_field(shell: &mut AppShell, name: &str) -> Result<NodeId> {
    let tree = shell.semantics_tree()?;
    let named = |node: &SemanticsNode| node.role == SemanticsRole::TextBox && node.name == name;
    tree.find(named)
        .map(|node| node.node_id)
        .with_context(|| format!("no text field named {name:?}"))
}

/// Fills both fields and submits with Enter, as a user would.
fn add_user(shell: &mut AppShell, name: &str, email: &str) -> Result<()> {
    let name_field = text_field(shell, "Name")?;
    shell.replace_text(name_field, name)?;
    let email_field = text_field(shell, "Email")?;
    shell.replace_text(email_field, email)?;
    shell.press_enter()?;
    Ok(())
}
