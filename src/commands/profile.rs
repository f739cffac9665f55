use crate::libs::messages::Message;
use crate::libs::settings::Settings;
use crate::{msg_info, msg_print, msg_success};
use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Input};

#[derive(Debug, Args)]
pub struct ProfileArgs {
    #[command(subcommand)]
    command: ProfileCommand,
}

#[derive(Debug, Subcommand)]
enum ProfileCommand {
    #[command(about = "Show the stored profile")]
    Show,
    #[command(about = "Set the baby's name")]
    Set {
        /// Name to store; prompts when omitted
        name: Option<String>,
    },
}

pub fn cmd(args: ProfileArgs) -> Result<()> {
    let mut settings = Settings::new()?;

    match args.command {
        ProfileCommand::Show => match settings.profile() {
            Some(profile) => msg_print!(Message::ProfileName(profile.name)),
            None => msg_info!(Message::ProfileNameNotSet),
        },
        ProfileCommand::Set { name } => {
            let name = match name {
                Some(name) => name,
                None => Input::<String>::with_theme(&ColorfulTheme::default())
                    .with_prompt(Message::PromptProfileName.to_string())
                    .with_initial_text(settings.name().unwrap_or_default())
                    .interact_text()?,
            };
            settings.set_name(&name)?;
            msg_success!(Message::ProfileSaved);
        }
    }

    Ok(())
}
