//! Subcommand execution and output formatting.

use anyhow::Context;
use api::{auth, images, ApiClient, Gallery, Image, UploadForm, UserInfo};
use store::TokenStore;

use crate::Command;

pub(crate) async fn run<S: TokenStore>(
    command: Command,
    client: &ApiClient<S>,
    json: bool,
) -> anyhow::Result<()> {
    match command {
        Command::Register {
            username,
            email,
            password,
        } => {
            let session = auth::register(client, &username, &password, &email).await?;
            print_user(&session.user, json)?;
        }
        Command::Login { username, password } => {
            let session = auth::login(client, &username, &password).await?;
            print_user(&session.user, json)?;
        }
        Command::Logout => {
            auth::logout(client);
            if !json {
                println!("Logged out");
            }
        }
        Command::Whoami => match auth::current_user(client).await {
            Some(user) => print_user(&user, json)?,
            None => anyhow::bail!("Not logged in"),
        },
        Command::List => {
            let mut gallery = Gallery::new();
            gallery.refresh(client).await?;
            print_images(gallery.images(), json)?;
        }
        Command::Show { id } => {
            let image = images::get(client, &id).await?;
            print_images(std::slice::from_ref(&image), json)?;
        }
        Command::Upload {
            path,
            title,
            description,
            analyze,
            prompt,
        } => {
            let mut form = UploadForm::from_path(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?
                .with_title(title)
                .with_description(description);
            if analyze || prompt.is_some() {
                form = form.with_analysis(prompt);
            }
            let image = images::upload(client, form).await?;
            print_images(std::slice::from_ref(&image), json)?;
        }
        Command::Analyze { id, prompt } => {
            let image = images::analyze(client, &id, prompt.as_deref()).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&image)?);
            } else {
                println!("{}", image.description);
            }
        }
        Command::Delete { id } => {
            images::delete(client, &id).await?;
            if !json {
                println!("Deleted image {}", id);
            }
        }
    }
    Ok(())
}

fn print_user(user: &UserInfo, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(user)?);
    } else {
        println!("{} <{}> (id {})", user.display_name(), user.email, user.id);
    }
    Ok(())
}

fn print_images(images: &[Image], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(images)?);
        return Ok(());
    }
    if images.is_empty() {
        println!("No images yet");
    }
    for image in images {
        println!("{}", format_image(image));
    }
    Ok(())
}

fn format_image(image: &Image) -> String {
    let mut line = format!(
        "{:>6}  {}  {}  {}",
        image.id, image.created_at, image.title, image.url
    );
    if !image.description.is_empty() {
        line.push_str("\n        ");
        line.push_str(&image.description);
    }
    line
}
