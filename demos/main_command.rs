//! CLI-style entry point: a single main command whose return shuts the
//! process down, alongside a background ticker component.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use convoy::{ComponentError, ComponentFn, Config, Supervisor};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut sup = Supervisor::new(Config::default())?;

    let ticker = ComponentFn::arc("ticker", |ctx: CancellationToken| async move {
        loop {
            tokio::select! {
                _ = ctx.cancelled() => return Ok::<_, ComponentError>(()),
                _ = tokio::time::sleep(Duration::from_millis(500)) => println!("tick"),
            }
        }
    });
    sup.load(vec![ticker]).await?;

    sup.main_command(|_ctx: CancellationToken| async move {
        println!("doing the one-shot work");
        tokio::time::sleep(Duration::from_secs(2)).await;
        println!("done, shutting everything down");
        Ok(())
    })
    .await?;

    if let Err(e) = sup.run().await {
        eprintln!("exited with error: {e}");
        std::process::exit(1);
    }
    Ok(())
}
