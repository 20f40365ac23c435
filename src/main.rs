use coupon_engine_rust::config::Config;
use coupon_engine_rust::coupons::AppState;
use coupon_engine_rust::router::create_app_router;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize application state
    let state = Arc::new(AppState::new());

    // Build application router with all routes and middleware
    let app = create_app_router(state);

    let addr = config.socket_addr();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Server running on http://{}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use coupon_engine_rust::coupons::AppState;
    use coupon_engine_rust::engine::{
        applicable_coupons, apply, validate_rule, Cart, CartLineItem, Coupon,
    };
    use rust_decimal::Decimal;
    use serde_json::json;

    #[test]
    fn test_store_and_engine_together() {
        let state = AppState::new();

        // 1. Store two coupons
        for (id, coupon_type, details) in [
            ("cw", "cart-wise", json!({ "threshold": 50, "discount": 5 })),
            ("pw", "product-wise", json!({ "product_id": "B", "discount": 1 })),
        ] {
            let rule = validate_rule(coupon_type, &details).expect("valid rule");
            state
                .coupons
                .insert(Coupon { id: id.into(), rule })
                .expect("insert failed");
        }

        // 2. Evaluate against a cart below the cart-wise threshold
        let cart = Cart::from_line_items(vec![CartLineItem {
            product_id: "B".into(),
            price: Decimal::from(10),
            quantity: 2,
        }]);
        let applicable =
            applicable_coupons(&state.coupons.list(), &cart).expect("evaluation failed");

        assert_eq!(applicable.len(), 1, "only the product-wise coupon applies");
        assert_eq!(applicable[0].coupon_id, "pw");

        // 3. Apply it
        let coupon = state.coupons.get("pw").unwrap();
        let applied = apply(&coupon.rule, &cart).expect("application failed");
        assert_eq!(applied.total_discount, Decimal::from(2));
        assert_eq!(
            applied.updated_line_items[0].discounted_price,
            Some(Decimal::from(9))
        );
    }
}
