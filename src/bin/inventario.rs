use std::str::FromStr;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = ApiClient::new(&cli.api_url);

    match cli.command {
        Commands::List => handle_list(&client, cli.json).await?,
        Commands::Get(args) => handle_get(&client, args, cli.json).await?,
        Commands::Create(args) => handle_create(&client, args, cli.json).await?,
        Commands::Update(args) => handle_update(&client, args, cli.json).await?,
        Commands::Delete(args) => handle_delete(&client, args).await?,
    }

    Ok(())
}

#[derive(Parser)]
#[command(name = "inventario", about = "Inventario CLI for managing inventory items", version)]
struct Cli {
    #[arg(
        long,
        global = true,
        env = "INVENTARIO_API_URL",
        default_value = "http://localhost:4000",
        help = "Base URL of the inventario-api server"
    )]
    api_url: String,
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON"
    )]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all items as a table
    List,
    /// Show a single item
    Get(GetArgs),
    /// Create a new item
    Create(ItemArgs),
    /// Replace all fields of an existing item
    Update(UpdateArgs),
    /// Delete an item
    Delete(DeleteArgs),
}

#[derive(Args)]
struct GetArgs {
    #[arg(help = "Item id")]
    id: Uuid,
}

#[derive(Args)]
struct ItemArgs {
    #[arg(long, help = "Unique item code")]
    code: String,
    #[arg(long, help = "Item name")]
    name: String,
    #[arg(long, help = "URL of the item photo")]
    photo: Option<String>,
    #[arg(long, help = "Item description")]
    description: String,
    #[arg(long, help = "Units on hand")]
    quantity: String,
    #[arg(long, help = "Unit price")]
    price: String,
}

#[derive(Args)]
struct UpdateArgs {
    #[arg(help = "Item id")]
    id: Uuid,
    #[command(flatten)]
    fields: ItemArgs,
}

#[derive(Args)]
struct DeleteArgs {
    #[arg(help = "Item id")]
    id: Uuid,
}

async fn handle_list(client: &ApiClient, json: bool) -> Result<()> {
    let items = client.list().await?;

    if json {
        print_json(&items)?;
    } else {
        render_table(&items);
    }

    Ok(())
}

async fn handle_get(client: &ApiClient, args: GetArgs, json: bool) -> Result<()> {
    let item = client.get(args.id).await?;

    if json {
        print_json(&item)?;
    } else {
        print_item(&item);
    }

    Ok(())
}

async fn handle_create(client: &ApiClient, args: ItemArgs, json: bool) -> Result<()> {
    let draft = build_draft(&args)?;
    let item = client.create(&draft).await?;

    if json {
        print_json(&item)?;
    } else {
        println!("Created item {} ({})", item.code, item.id);
        print_item(&item);
    }

    Ok(())
}

async fn handle_update(client: &ApiClient, args: UpdateArgs, json: bool) -> Result<()> {
    let draft = build_draft(&args.fields)?;
    let item = client.update(args.id, &draft).await?;

    if json {
        print_json(&item)?;
    } else {
        println!("Updated item {} ({})", item.code, item.id);
        print_item(&item);
    }

    Ok(())
}

async fn handle_delete(client: &ApiClient, args: DeleteArgs) -> Result<()> {
    let confirmation = client.delete(args.id).await?;
    println!("{}", confirmation.message);
    Ok(())
}

/// Validated form values for a create or update call. Mirrors the checks the
/// server applies so obviously bad input never leaves the terminal.
#[derive(Debug, Serialize)]
struct ItemDraft {
    code: String,
    name: String,
    photo: Option<String>,
    description: String,
    quantity: i32,
    price: Decimal,
}

fn build_draft(args: &ItemArgs) -> Result<ItemDraft> {
    let code = args.code.trim();
    if code.is_empty() {
        bail!("code must not be empty");
    }
    let name = args.name.trim();
    if name.is_empty() {
        bail!("name must not be empty");
    }
    let description = args.description.trim();
    if description.is_empty() {
        bail!("description must not be empty");
    }

    let quantity: i32 = args
        .quantity
        .trim()
        .parse()
        .context("quantity must be a whole number")?;
    if quantity < 0 {
        bail!("quantity must be non-negative");
    }

    let price = Decimal::from_str(args.price.trim()).context("price must be a number")?;
    if price.is_sign_negative() {
        bail!("price must be non-negative");
    }

    let photo = args
        .photo
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(ToString::to_string);

    Ok(ItemDraft {
        code: code.to_string(),
        name: name.to_string(),
        photo,
        description: description.to_string(),
        quantity,
        price,
    })
}

#[derive(Debug, Serialize, Deserialize)]
struct Item {
    id: Uuid,
    code: String,
    name: String,
    photo: Option<String>,
    description: String,
    quantity: i32,
    price: Decimal,
}

#[derive(Debug, Deserialize)]
struct Confirmation {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn items_url(&self) -> String {
        format!("{}/api/items", self.base_url)
    }

    fn item_url(&self, id: Uuid) -> String {
        format!("{}/api/items/{}", self.base_url, id)
    }

    async fn list(&self) -> Result<Vec<Item>> {
        let response = self
            .http
            .get(self.items_url())
            .send()
            .await
            .context("failed to reach the inventario-api server")?;
        Self::parse(response).await
    }

    async fn get(&self, id: Uuid) -> Result<Item> {
        let response = self
            .http
            .get(self.item_url(id))
            .send()
            .await
            .context("failed to reach the inventario-api server")?;
        Self::parse(response).await
    }

    async fn create(&self, draft: &ItemDraft) -> Result<Item> {
        let response = self
            .http
            .post(self.items_url())
            .json(draft)
            .send()
            .await
            .context("failed to reach the inventario-api server")?;
        Self::parse(response).await
    }

    async fn update(&self, id: Uuid, draft: &ItemDraft) -> Result<Item> {
        let response = self
            .http
            .put(self.item_url(id))
            .json(draft)
            .send()
            .await
            .context("failed to reach the inventario-api server")?;
        Self::parse(response).await
    }

    async fn delete(&self, id: Uuid) -> Result<Confirmation> {
        let response = self
            .http
            .delete(self.item_url(id))
            .send()
            .await
            .context("failed to reach the inventario-api server")?;
        Self::parse(response).await
    }

    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .await
                .context("server returned an unreadable response body");
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .map(|body| body.message)
            .unwrap_or_else(|_| status.to_string());
        bail!("server rejected the request ({}): {}", status, message)
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_item(item: &Item) {
    println!("Id:          {}", item.id);
    println!("Code:        {}", item.code);
    println!("Name:        {}", item.name);
    println!("Photo:       {}", item.photo.as_deref().unwrap_or("-"));
    println!("Description: {}", item.description);
    println!("Quantity:    {}", item.quantity);
    println!("Price:       {}", item.price);
}

fn render_table(items: &[Item]) {
    if items.is_empty() {
        println!("No items in inventory");
        return;
    }

    println!(
        "{:<36}  {:<12} {:<28} {:>8} {:>12}  {}",
        "ID", "CODE", "NAME", "QTY", "PRICE", "DESCRIPTION"
    );
    for item in items {
        println!(
            "{:<36}  {:<12} {:<28} {:>8} {:>12}  {}",
            item.id, item.code, item.name, item.quantity, item.price, item.description
        );
    }
    println!("{} item(s)", items.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn args(code: &str, quantity: &str, price: &str) -> ItemArgs {
        ItemArgs {
            code: code.to_string(),
            name: "Intel i7".to_string(),
            photo: None,
            description: "desc".to_string(),
            quantity: quantity.to_string(),
            price: price.to_string(),
        }
    }

    #[test]
    fn draft_parses_numeric_fields() {
        let draft = build_draft(&args("CPU001", "10", "299.99")).unwrap();
        assert_eq!(draft.quantity, 10);
        assert_eq!(draft.price, dec!(299.99));
    }

    #[test]
    fn draft_rejects_empty_required_fields() {
        assert!(build_draft(&args("  ", "10", "299.99")).is_err());

        let mut invalid = args("CPU001", "10", "299.99");
        invalid.name = String::new();
        assert!(build_draft(&invalid).is_err());

        let mut invalid = args("CPU001", "10", "299.99");
        invalid.description = " ".to_string();
        assert!(build_draft(&invalid).is_err());
    }

    #[test]
    fn draft_rejects_malformed_numbers() {
        assert!(build_draft(&args("CPU001", "ten", "299.99")).is_err());
        assert!(build_draft(&args("CPU001", "10", "cheap")).is_err());
        assert!(build_draft(&args("CPU001", "10.5", "299.99")).is_err());
    }

    #[test]
    fn draft_rejects_negative_numbers() {
        assert!(build_draft(&args("CPU001", "-1", "299.99")).is_err());
        assert!(build_draft(&args("CPU001", "10", "-0.01")).is_err());
    }

    #[test]
    fn blank_photo_becomes_none() {
        let mut with_blank = args("CPU001", "10", "299.99");
        with_blank.photo = Some("   ".to_string());
        let draft = build_draft(&with_blank).unwrap();
        assert!(draft.photo.is_none());

        let mut with_url = args("CPU001", "10", "299.99");
        with_url.photo = Some("https://example.com/cpu.jpg".to_string());
        let draft = build_draft(&with_url).unwrap();
        assert_eq!(draft.photo.as_deref(), Some("https://example.com/cpu.jpg"));
    }
}
