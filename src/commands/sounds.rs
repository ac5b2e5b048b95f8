use crate::libs::alert::AlertSound;
use crate::libs::config::Config;
use crate::libs::messages::Message;
use crate::{msg_print, msg_success};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct SoundsArgs {
    /// Play this sound instead of listing them
    #[arg(long, value_enum)]
    play: Option<AlertSound>,
}

/// Lists the alert sounds, marking the configured one, or plays one.
pub async fn cmd(args: SoundsArgs) -> Result<()> {
    if let Some(sound) = args.play {
        tokio::task::spawn_blocking(move || sound.play()).await??;
        msg_success!(Message::SoundPlayed(sound.to_string()));
        return Ok(());
    }

    let configured = Config::read()?.alert.unwrap_or_default().sound;
    msg_print!(Message::SoundsHeader);
    for sound in AlertSound::all() {
        msg_print!(Message::SoundEntry {
            name: sound.to_string(),
            description: sound.description().to_string(),
            selected: *sound == configured,
        });
    }
    Ok(())
}
