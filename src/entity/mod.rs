pub mod cart_items;
pub mod carts;
pub mod coupons;
pub mod order_items;
pub mod orders;
pub mod products;
pub mod wishlist_items;

pub use cart_items::Entity as CartItems;
pub use carts::Entity as Carts;
pub use coupons::Entity as Coupons;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use products::Entity as Products;
pub use wishlist_items::Entity as WishlistItems;
