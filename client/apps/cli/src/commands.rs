//! Command Handlers

use std::sync::Arc;

use auth::models::SessionPhase;
use auth::usecase::{
    RegisterUseCase, SignInInput, SignInUseCase, SignOutUseCase, SignUpInput,
};
use auth::{AuthError, Navigation};
use kernel::error::app_error::AppError;

use crate::Context;

/// Turn a session error into the message the user should see
fn report(err: AuthError) -> anyhow::Error {
    let app: AppError = err.into();
    match app.action() {
        Some(action) => anyhow::anyhow!("{} {}", app.user_message(), action),
        None => anyhow::anyhow!("{}", app.user_message()),
    }
}

pub async fn login(ctx: &Context, email: String, password: String) -> anyhow::Result<()> {
    let use_case = SignInUseCase::new(Arc::clone(&ctx.identity), Arc::clone(&ctx.config));
    let output = use_case
        .execute(SignInInput { email, password })
        .await
        .map_err(report)?;

    println!("Signed in as {}", output.email);
    println!("-> {}", output.redirect_to);
    Ok(())
}

pub async fn logout(ctx: &Context) -> anyhow::Result<()> {
    let use_case = SignOutUseCase::new(Arc::clone(&ctx.identity), Arc::clone(&ctx.config));
    let output = use_case.execute().await;

    println!("Signed out");
    println!("-> {}", output.redirect_to);
    Ok(())
}

pub async fn register(
    ctx: &Context,
    email: String,
    password: String,
    full_name: String,
    phone_number: String,
    admin_secret: Option<String>,
) -> anyhow::Result<()> {
    let gateway = Arc::clone(&ctx.source);
    let use_case = RegisterUseCase::new(gateway, ctx.credentials().clone(), Arc::clone(&ctx.config));
    let output = use_case
        .execute(SignUpInput {
            email,
            password,
            full_name,
            phone_number,
            admin_secret,
        })
        .await
        .map_err(report)?;

    println!(
        "{}",
        output
            .message
            .as_deref()
            .unwrap_or("Registration successful. Please log in.")
    );
    println!("-> {}", output.redirect_to);
    Ok(())
}

pub async fn whoami(ctx: &Context) -> anyhow::Result<()> {
    let (_, Some(profile)) = ctx.sessions.session_with_profile().await else {
        println!("Not signed in");
        return Ok(());
    };

    println!("Email:   {}", profile.email.as_deref().unwrap_or("-"));
    println!("Name:    {}", profile.full_name);
    println!("Phone:   {}", profile.phone_number.as_deref().unwrap_or("-"));
    println!("Role:    {}", profile.role);
    if profile.degraded {
        println!("(profile service unavailable, showing cached details)");
    }
    Ok(())
}

pub async fn visit(ctx: &Context, path: &str) -> anyhow::Result<()> {
    let router = auth::AppRouter::new(ctx.clone());
    match router.navigate(path).await {
        Navigation::Render(path) => println!("render {path}"),
        Navigation::Redirect(target) => println!("redirect {target}"),
    }
    Ok(())
}

pub async fn watch(ctx: &Context) -> anyhow::Result<()> {
    let monitor = ctx.monitor();
    let mut phases = monitor.watch();
    print_phase(&phases.borrow_and_update());

    loop {
        tokio::select! {
            changed = phases.changed() => {
                if changed.is_err() {
                    break;
                }
                print_phase(&phases.borrow_and_update());
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    monitor.stop();
    Ok(())
}

fn print_phase(phase: &SessionPhase) {
    match phase {
        SessionPhase::Unknown | SessionPhase::Checking => println!("checking..."),
        SessionPhase::Anonymous => println!("signed out"),
        SessionPhase::Authenticated { role: None } => println!("signed in (role pending)"),
        SessionPhase::Authenticated { role: Some(role) } => println!("signed in as {role}"),
    }
}
