use akilli_emlakci::core::{FailureKind, FormField, UiStatus};
use akilli_emlakci::utils::error::ErrorSeverity;
use akilli_emlakci::utils::{logger, validation::Validate};
use akilli_emlakci::{ApiClient, CliConfig, Command, EmlakError, FormController, FormView};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

type Controller = FormController<ApiClient, ApiClient>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    let file_config = match config.load_file() {
        Ok(file_config) => file_config,
        Err(e) => exit_with(&e),
    };

    let verbose = config.verbose || file_config.as_ref().is_some_and(|f| f.verbose());
    let json_logs = config.json_logs || file_config.as_ref().is_some_and(|f| f.json_logs());

    // 初始化日誌
    if json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::info!("Starting akilli-emlakci");
    if verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Some(file_config) = &file_config {
        if let Err(e) = file_config.validate() {
            exit_with(&e);
        }
    }
    let settings = config.settings(file_config.as_ref());
    if let Err(e) = settings.validate() {
        exit_with(&e);
    }

    tracing::debug!("Using prediction service at {}", settings.base_url);
    let client = ApiClient::from_config(&settings);
    let mut controller = FormController::new(client.clone(), client);
    controller.load_locations().await;

    let status = match config.command {
        Command::Cities { json } => {
            print_cities(&controller, json)?;
            controller.status().clone()
        }
        Command::Predict {
            il,
            ilce,
            metrekare,
            oda_sayisi,
            salon_sayisi,
        } => {
            choose_city(&mut controller, &il);
            if !ilce.is_empty() {
                controller.select_district(&ilce);
            }
            controller.set_field(FormField::Area, metrekare);
            controller.set_field(FormField::RoomCount, oda_sayisi);
            controller.set_field(FormField::LivingRoomCount, salon_sayisi);

            controller.submit().await;
            print!("{}", FormView::from_controller(&controller));
            controller.status().clone()
        }
        Command::Form => run_interactive(&mut controller).await?,
    };

    if let UiStatus::Error(message) = &status {
        eprintln!("❌ {}", message);
        let exit_code = match controller.last_failure() {
            Some(FailureKind::Validation) => 1,
            _ => 2,
        };
        std::process::exit(exit_code);
    }

    Ok(())
}

fn exit_with(e: &EmlakError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

fn print_cities(controller: &Controller, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(controller.taxonomy())?);
        return Ok(());
    }

    for (city, districts) in controller.taxonomy().iter() {
        println!("{} ({})", city, districts.join(", "));
    }
    Ok(())
}

// 只接受清單裡的選項，和下拉選單一樣
fn choose_city(controller: &mut Controller, city: &str) {
    if city.is_empty() {
        return;
    }
    if controller.taxonomy().contains_city(city) {
        controller.select_city(city);
    } else {
        tracing::warn!("'{}' is not one of the available cities", city);
    }
}

/// Accepts either a 1-based option number or the option text itself.
fn pick_option<'a>(options: &'a [String], answer: &str) -> Option<&'a str> {
    let answer = answer.trim();
    if let Ok(index) = answer.parse::<usize>() {
        return index
            .checked_sub(1)
            .and_then(|i| options.get(i))
            .map(String::as_str);
    }
    options.iter().find(|o| *o == answer).map(String::as_str)
}

async fn prompt(lines: &mut Lines<BufReader<Stdin>>, label: &str) -> std::io::Result<Option<String>> {
    eprint!("{}: ", label);
    lines.next_line().await
}

async fn run_interactive(
    controller: &mut Controller,
) -> anyhow::Result<UiStatus> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("{}", FormView::from_controller(controller));

        for (i, city) in controller.cities().iter().enumerate() {
            println!("  {:>3}. {}", i + 1, city);
        }
        let Some(answer) = prompt(&mut lines, "Şehir").await? else {
            break;
        };
        if let Some(city) = pick_option(controller.cities(), &answer).map(str::to_string) {
            controller.select_city(&city);
        }

        if controller.district_enabled() {
            for (i, district) in controller.districts().iter().enumerate() {
                println!("  {:>3}. {}", i + 1, district);
            }
            let Some(answer) = prompt(&mut lines, "İlçe").await? else {
                break;
            };
            if let Some(district) = pick_option(controller.districts(), &answer).map(str::to_string)
            {
                controller.select_district(&district);
            }
        }

        for field in FormField::ALL {
            let label = format!("{} [{}]", field.label(), field.placeholder());
            let Some(answer) = prompt(&mut lines, &label).await? else {
                return Ok(controller.status().clone());
            };
            controller.set_field(field, answer.trim());
        }

        controller.submit().await;
        print!("{}", FormView::from_controller(controller));

        let again = prompt(&mut lines, "Tekrar? (e/H)").await?;
        if !again.is_some_and(|a| a.trim().eq_ignore_ascii_case("e")) {
            break;
        }
    }

    Ok(controller.status().clone())
}
