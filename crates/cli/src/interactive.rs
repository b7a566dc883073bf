//! Line-based front end for the referral wizard.

use std::io::{self, BufRead, Write};

use api_shared::AgeGroup;
use referral_wizard::{
    Completion, HttpConditionsClient, WizardError, WizardSession, WizardState, BODY_AREAS,
};

type Session = WizardSession<HttpConditionsClient>;

const HELP: &str = "b = back, s = start again, r = retry, q = quit";

pub async fn run(api_url: &str) -> anyhow::Result<()> {
    let mut session = WizardSession::new(HttpConditionsClient::new(api_url));
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!("Referral guide at {} ({})", api_url, HELP);

    loop {
        render(session.wizard().state());
        if let Some(failure) = session.wizard().failure() {
            println!("! {} (r to retry)", failure.message);
        }

        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next().transpose()? else {
            break;
        };
        let input = line.trim();

        let outcome = match input {
            "q" => break,
            "b" => session.back().map(|_| None),
            "s" => {
                session.start_again();
                Ok(None)
            }
            "r" => session.retry().await.map(Some),
            _ => act(&mut session, input).await,
        };

        match outcome {
            Ok(Some(Completion::Discarded)) => println!("(response ignored)"),
            Ok(_) => {}
            Err(err) => println!("! {}", err),
        }
    }

    Ok(())
}

fn render(state: &WizardState) {
    println!();
    match state {
        WizardState::Start => println!("Press enter to start."),
        WizardState::PatientType => {
            println!("Patient type:");
            println!("  1. Adult");
            println!("  2. Child");
        }
        WizardState::BodyArea { age_group } => {
            println!("Body area ({}):", age_group);
            for (i, area) in BODY_AREAS.iter().enumerate() {
                println!("  {}. {}", i + 1, area.name);
            }
        }
        WizardState::PanelCondition(picker) => {
            println!("Panels for {}:", picker.body_area);
            for (i, panel) in picker.panels.iter().enumerate() {
                let mark = if picker.panel.as_ref() == Some(panel) { "*" } else { " " };
                println!(" {}p{}. {}", mark, i + 1, panel);
            }
            if !picker.conditions.is_empty() {
                println!("Conditions:");
                for (i, option) in picker.conditions.iter().enumerate() {
                    let mark = if picker.condition.as_ref() == Some(&option.label) {
                        "*"
                    } else {
                        " "
                    };
                    println!(" {}c{}. {} ({})", mark, i + 1, option.label, option.severity);
                }
            }
            if picker.condition.is_some() {
                println!("n = next");
            }
        }
        WizardState::ScenarioList(stage) => {
            println!("Scenarios for {} / {}:", stage.panel, stage.condition);
            if stage.scenarios.is_empty() {
                println!("  (none)");
            }
            for (i, scenario) in stage.scenarios.iter().enumerate() {
                println!(
                    "  {}. {}",
                    i + 1,
                    scenario
                        .scenario_description
                        .as_deref()
                        .unwrap_or(&scenario.scenario_id)
                );
            }
        }
        WizardState::Results(results) => {
            println!(
                "Procedures for {}:",
                results
                    .scenario
                    .scenario_description
                    .as_deref()
                    .unwrap_or(&results.scenario.scenario_id)
            );
            for procedure in results.visible() {
                println!(
                    "  - {} [{:?}] {}",
                    procedure.name.as_deref().unwrap_or("(unnamed procedure)"),
                    procedure.appropriate,
                    procedure.radiation_string
                );
            }
            let verb = if results.show_not_appropriate { "hide" } else { "show" };
            println!("t = {} rarely/not appropriate", verb);
        }
    }
}

/// 1-based index into a list of `len` entries.
fn pick(input: &str, len: usize) -> Option<usize> {
    input
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=len).contains(n))
        .map(|n| n - 1)
}

fn unknown(input: &str) -> WizardError {
    WizardError::UnknownOption {
        kind: "choice",
        value: input.to_string(),
    }
}

async fn act(session: &mut Session, input: &str) -> Result<Option<Completion>, WizardError> {
    match session.wizard().state() {
        WizardState::Start => session.start().map(|_| None),
        WizardState::PatientType => {
            let age_group = match input {
                "1" => AgeGroup::Adult,
                "2" => AgeGroup::Child,
                other => other.parse().map_err(|_| unknown(input))?,
            };
            session.select_patient(age_group).map(|_| None)
        }
        WizardState::BodyArea { .. } => {
            let area = pick(input, BODY_AREAS.len())
                .map(|i| BODY_AREAS[i].query)
                .ok_or_else(|| unknown(input))?;
            session.select_body_area(area).await.map(Some)
        }
        WizardState::PanelCondition(picker) => {
            if input == "n" {
                return session.next().await.map(Some);
            }
            if let Some(i) = input.strip_prefix('p').and_then(|n| pick(n, picker.panels.len())) {
                let panel = picker.panels[i].clone();
                return session.select_panel(&panel).await.map(Some);
            }
            if let Some(i) = input
                .strip_prefix('c')
                .and_then(|n| pick(n, picker.conditions.len()))
            {
                let condition = picker.conditions[i].label.clone();
                return session.select_condition(&condition).map(|_| None);
            }
            Err(unknown(input))
        }
        WizardState::ScenarioList(stage) => {
            let scenario_id = pick(input, stage.scenarios.len())
                .map(|i| stage.scenarios[i].scenario_id.clone())
                .ok_or_else(|| unknown(input))?;
            session.select_scenario(&scenario_id).await.map(Some)
        }
        WizardState::Results(_) if input == "t" => session.toggle_not_appropriate().map(|_| None),
        WizardState::Results(_) => Err(unknown(input)),
    }
}
