use market_engine::{
    db_types::{
        ChatMessage,
        NewMessage,
        NewOrder,
        Order,
        OrderId,
        OrderStatus,
        ProductId,
        ProductSnapshot,
        ShopId,
        ShopSnapshot,
        UserId,
    },
    order_objects::OrderRecord,
    traits::{
        CatalogError,
        CatalogReader,
        MessageStore,
        MessageStoreError,
        OrderStore,
        OrderStoreError,
    },
};
use mockall::mock;

mock! {
    pub MarketDb {}
    impl CatalogReader for MarketDb {
        async fn user_exists(&self, user_id: &UserId) -> Result<bool, CatalogError>;
        async fn product_by_id(&self, product_id: &ProductId) -> Result<Option<ProductSnapshot>, CatalogError>;
        async fn shop_for_user(&self, user_id: &UserId) -> Result<Option<ShopSnapshot>, CatalogError>;
    }
    impl OrderStore for MarketDb {
        async fn create_order(&self, order: NewOrder) -> Result<OrderRecord, OrderStoreError>;
        async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<OrderRecord>, OrderStoreError>;
        async fn orders_for_buyer(&self, buyer_id: &UserId) -> Result<Vec<OrderRecord>, OrderStoreError>;
        async fn orders_for_shop(&self, shop_id: &ShopId) -> Result<Vec<OrderRecord>, OrderStoreError>;
        async fn set_order_status(&self, order_id: &OrderId, status: OrderStatus) -> Result<Order, OrderStoreError>;
    }
    impl MessageStore for MarketDb {
        async fn append_message(&self, message: NewMessage) -> Result<ChatMessage, MessageStoreError>;
        async fn messages_for_order(&self, order_id: &OrderId) -> Result<Vec<ChatMessage>, MessageStoreError>;
    }
}
