//! Application root: wires configuration, logging, the catalog client and
//! the persistence adapter into a product store, then dispatches one command
//! against it.

use std::env;
use std::process::ExitCode;

use product_catalog::client::http::HttpCatalogClient;
use product_catalog::domain::product::Product;
use product_catalog::domain::types::ProductId;
use product_catalog::forms::products::{
    AddProductForm, AddProductFormPayload, UpdateProductForm, UpdateProductFormPayload,
};
use product_catalog::models::config::AppConfig;
use product_catalog::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use product_catalog::repository::json::JsonFileRepository;
use product_catalog::store::{ProductListQuery, ProductStore};

type Store = ProductStore<HttpCatalogClient, JsonFileRepository>;

const USAGE: &str = "usage: product-catalog <command>

commands:
  list [page]                        show a page of the catalog
  liked [page]                       show liked products only
  search <query> [page]              search titles, descriptions and prices
  show <id>                          show one product
  add <title> <price> <image> <description...>
                                     create a local product
  like <id>                          toggle the like flag
  remove <id>                        delete a product
  edit <id> <title|description|price|image> <value>
                                     update one field";

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::init();

    let app_config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let client = HttpCatalogClient::new(app_config.api_base_url.clone());
    let repo = JsonFileRepository::new(app_config.storage_path.clone());
    let mut store = ProductStore::new(client, repo);

    let args: Vec<String> = env::args().skip(1).collect();
    match run(&mut store, &args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn load_config() -> Result<AppConfig, config::ConfigError> {
    config::Config::builder()
        .add_source(config::File::with_name("catalog").required(false))
        .add_source(config::Environment::with_prefix("CATALOG"))
        .build()?
        .try_deserialize()
}

async fn run(store: &mut Store, args: &[String]) -> Result<(), String> {
    let mut args = args.iter().map(String::as_str);
    let command = args.next().ok_or_else(|| USAGE.to_string())?;
    let rest: Vec<&str> = args.collect();

    match command {
        "list" => {
            fetch(store).await?;
            let page = parse_page(rest.first())?;
            print_page(&store.list_products(
                &ProductListQuery::default().paginate(page, DEFAULT_ITEMS_PER_PAGE),
            ));
            Ok(())
        }
        "liked" => {
            fetch(store).await?;
            let page = parse_page(rest.first())?;
            print_page(&store.list_products(
                &ProductListQuery::default()
                    .liked()
                    .paginate(page, DEFAULT_ITEMS_PER_PAGE),
            ));
            Ok(())
        }
        "search" => {
            let query = rest.first().ok_or_else(|| USAGE.to_string())?;
            fetch(store).await?;
            let page = parse_page(rest.get(1))?;
            print_page(&store.list_products(
                &ProductListQuery::default()
                    .search(*query)
                    .paginate(page, DEFAULT_ITEMS_PER_PAGE),
            ));
            Ok(())
        }
        "show" => {
            let id = parse_id(rest.first())?;
            fetch(store).await?;
            let product = store
                .load_product(&id)
                .await
                .map_err(|e| e.to_string())?;
            print_detail(&product);
            Ok(())
        }
        "add" => {
            if rest.len() < 4 {
                return Err(USAGE.to_string());
            }
            let price: f64 = rest[1]
                .parse()
                .map_err(|_| format!("invalid price: {}", rest[1]))?;
            let form = AddProductForm {
                title: rest[0].to_string(),
                price,
                image: rest[2].to_string(),
                description: rest[3..].join(" "),
            };
            let payload = AddProductFormPayload::try_from(form).map_err(|e| e.to_string())?;
            let product = store
                .add_product(payload.into_new_product())
                .map_err(|e| e.to_string())?;
            println!("created {}", product.id);
            Ok(())
        }
        "like" => {
            let id = parse_id(rest.first())?;
            fetch(store).await?;
            match store.toggle_like(&id).map_err(|e| e.to_string())? {
                Some(product) if product.is_liked => println!("liked {}", product.id),
                Some(product) => println!("unliked {}", product.id),
                None => println!("no product with id {id}"),
            }
            Ok(())
        }
        "remove" => {
            let id = parse_id(rest.first())?;
            fetch(store).await?;
            match store.remove_product(&id).map_err(|e| e.to_string())? {
                Some(product) => println!("removed {}", product.id),
                None => println!("no product with id {id}"),
            }
            Ok(())
        }
        "edit" => {
            let id = parse_id(rest.first())?;
            let (field, value) = match (rest.get(1), rest.get(2)) {
                (Some(field), Some(value)) => (*field, *value),
                _ => return Err(USAGE.to_string()),
            };
            let form = update_form(field, value)?;
            let payload = UpdateProductFormPayload::try_from(form).map_err(|e| e.to_string())?;
            fetch(store).await?;
            match store
                .update_product(&id, payload.into_patch())
                .map_err(|e| e.to_string())?
            {
                Some(product) => println!("updated {}", product.id),
                None => println!("no product with id {id}"),
            }
            Ok(())
        }
        _ => Err(USAGE.to_string()),
    }
}

/// Runs a fetch and converts the store's surfaced error into a CLI failure.
async fn fetch(store: &mut Store) -> Result<(), String> {
    store.fetch_products().await;
    match store.error() {
        Some(error) => Err(error.to_string()),
        None => Ok(()),
    }
}

fn parse_page(arg: Option<&&str>) -> Result<usize, String> {
    match arg {
        Some(raw) => raw
            .parse()
            .map_err(|_| format!("invalid page number: {raw}")),
        None => Ok(1),
    }
}

fn parse_id(arg: Option<&&str>) -> Result<ProductId, String> {
    let raw = arg.ok_or_else(|| USAGE.to_string())?;
    ProductId::new(*raw).map_err(|e| e.to_string())
}

fn update_form(field: &str, value: &str) -> Result<UpdateProductForm, String> {
    let mut form = UpdateProductForm {
        title: None,
        description: None,
        price: None,
        image: None,
    };
    match field {
        "title" => form.title = Some(value.to_string()),
        "description" => form.description = Some(value.to_string()),
        "price" => {
            form.price = Some(value.parse().map_err(|_| format!("invalid price: {value}"))?);
        }
        "image" => form.image = Some(value.to_string()),
        _ => return Err(USAGE.to_string()),
    }
    Ok(form)
}

fn print_page(page: &Paginated<Product>) {
    if page.items.is_empty() {
        println!("no products");
        return;
    }
    for product in &page.items {
        let liked = if product.is_liked { " *" } else { "" };
        println!(
            "{:<12} {:<40} ${}{}",
            product.id.as_str(),
            product.title.as_str(),
            product.price,
            liked
        );
    }
    if page.total_pages > 1 {
        println!("page {} of {}", page.page, page.total_pages);
    }
}

fn print_detail(product: &Product) {
    println!("{}", product.title);
    println!("id:      {}", product.id);
    println!("price:   ${}", product.price);
    println!("image:   {}", product.image);
    println!("liked:   {}", product.is_liked);
    println!("created: {}", product.created_at);
    println!();
    println!("{}", product.description);
}
