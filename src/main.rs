use rust_loyalty_directory::{
    commands::{CreateCustomerRequest, GetCustomerRequest, UpdateCustomerRequest},
    domain::{Customer, Phone},
    CustomerDirectory,
};
use serde::Serialize;
use tower::BoxError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Walk through every directory operation, printing the results
#[tokio::main]
async fn main() -> Result<(), BoxError> {
    setup_logging();

    let mut directory = CustomerDirectory::in_memory();

    section(1, "Adding customer John Doe (1234567890, john@doe.io)");
    println!("Expect: a customer with the right details");
    let req = CreateCustomerRequest::new("John Doe", 1234567890, "john@doe.io", "password");
    let customer = directory.create(req).await?;
    print_json(&customer)?;

    section(2, "Adding a pre-existing phone number and email");
    println!("Expect: two failures");
    for req in [
        CreateCustomerRequest::new("John Doe", 1234567890, "some1@doe.io", "password"),
        CreateCustomerRequest::new("John Doe", 2345678901, "john@doe.io", "password"),
    ] {
        match directory.create(req).await {
            Ok(customer) => print_json(&customer)?,
            Err(err) => println!("failed: {err}"),
        }
    }

    section(3, "Getting John Doe by email, then by phone number");
    println!("Expect: two identical customers");
    let by_email = directory
        .find(GetCustomerRequest::by_email("john@doe.io"))
        .await?;
    let by_phone = directory
        .find(GetCustomerRequest::by_phone(1234567890))
        .await?;
    print_json(&by_phone)?;
    print_json(&by_email)?;

    section(4, "Updating name, email, phone number and password");
    println!("Expect: a customer with the updated details");
    let id = by_email.id;
    for req in [
        UpdateCustomerRequest {
            name: Some("Jane Doe".to_string()),
            ..UpdateCustomerRequest::new(id)
        },
        UpdateCustomerRequest {
            email: Some("jane@doe.io".to_string()),
            ..UpdateCustomerRequest::new(id)
        },
        UpdateCustomerRequest {
            phone: Some(Phone(10987654321)),
            ..UpdateCustomerRequest::new(id)
        },
        UpdateCustomerRequest {
            password: Some("newpassword".to_string()),
            ..UpdateCustomerRequest::new(id)
        },
    ] {
        directory.update(req).await?;
    }
    print_json(&directory.find(GetCustomerRequest::by_id(id)).await?)?;

    section(5, "Adding 100 points to Jane Doe's account");
    println!("Expect: a balance of 100");
    directory.add_points(id, 100).await?;
    print_json(&directory.find(GetCustomerRequest::by_id(id)).await?)?;

    section(6, "Removing 50 points from Jane Doe's account");
    println!("Expect: a balance of 50");
    directory.remove_points(id, 50).await?;
    print_json(&directory.find(GetCustomerRequest::by_id(id)).await?)?;

    section(7, "Deleting customer Jane Doe");
    println!("Expect: no customers left");
    directory.delete(id).await?;
    let remaining: Vec<Customer> = directory.list_all().await?;
    print_json(&remaining)?;

    Ok(())
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_names(false)
        .with_line_number(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

fn section(number: u32, title: &str) {
    println!("============= TEST {number} =============");
    println!("{title}...");
}

fn print_json(value: &impl Serialize) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
