use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    domain::{CustomerInfo, DiscountType, Order, OrderItem, OrderStatus},
    dto::{
        cart::{AddToCartRequest, CartLine, CartView, UpdateCartItemRequest},
        coupons::{ApplyCouponRequest, CouponApplication, CouponList, CouponSummary},
        orders::{CheckoutRequest, OrderList, OrderReceipt},
        products::{CategoryList, ProductDto, ProductList},
        wishlist::{AddToWishlistRequest, WishlistView},
    },
    error::ErrorData,
    models::{Category, Product},
    response::{ApiResponse, Meta},
    routes::{cart, checkout, coupons, health, params, products, wishlist},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        products::list_products,
        products::get_product,
        products::list_categories,
        cart::get_cart,
        cart::add_to_cart,
        cart::update_cart_item,
        cart::remove_cart_item,
        cart::clear_cart,
        coupons::apply_coupon,
        coupons::list_coupons,
        checkout::checkout,
        checkout::list_orders,
        checkout::get_order,
        wishlist::get_wishlist,
        wishlist::add_to_wishlist,
        wishlist::remove_from_wishlist
    ),
    components(
        schemas(
            Product,
            Category,
            ProductDto,
            ProductList,
            CategoryList,
            CartLine,
            CartView,
            AddToCartRequest,
            UpdateCartItemRequest,
            ApplyCouponRequest,
            CouponApplication,
            CouponSummary,
            CouponList,
            DiscountType,
            CheckoutRequest,
            CustomerInfo,
            OrderReceipt,
            Order,
            OrderItem,
            OrderStatus,
            OrderList,
            AddToWishlistRequest,
            WishlistView,
            params::ProductQuery,
            ErrorData,
            Meta,
            ApiResponse<ProductDto>,
            ApiResponse<CartView>,
            ApiResponse<OrderReceipt>,
            ApiResponse<Order>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Catalog browsing"),
        (name = "Cart", description = "Per-user shopping carts"),
        (name = "Coupons", description = "Coupon preview and listing"),
        (name = "Checkout", description = "Checkout and order history"),
        (name = "Wishlist", description = "Per-user wishlists"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
